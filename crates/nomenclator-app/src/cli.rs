//! Command-line arguments.

use std::{num::NonZeroU32, path::PathBuf};

use clap::{Parser, Subcommand};
use nomenclator_core::{DEFAULT_BORDER, GridIndexer};
use nomenclator_engine::{ColumnSpec, DEFAULT_STREET_COLUMN, DEFAULT_X_COLUMN, DEFAULT_Y_COLUMN};
use nomenclator_street::{StreetFormatter, StreetTypes};

use crate::AppError;

/// Assigns map-grid sheet indices to point coordinates.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the per-street index of a table of points.
    Index(IndexArgs),
    /// Append index and sheet columns to every row of a table.
    Annotate(AnnotateArgs),
    /// Index a single point.
    Point(PointArgs),
}

/// Grid configuration shared by all commands.
#[derive(Debug, Clone, clap::Args)]
pub struct GridArgs {
    /// X coordinate of the grid origin.
    #[arg(long, value_name = "X", allow_negative_numbers = true)]
    pub origin_x: f64,

    /// Y coordinate of the grid origin.
    #[arg(long, value_name = "Y", allow_negative_numbers = true)]
    pub origin_y: f64,

    /// Edge length of a grid square, in meters.
    #[arg(long, value_name = "METERS", default_value = "500")]
    pub cell_size: NonZeroU32,

    /// X distance from the origin separating near and far sheets.
    #[arg(long, value_name = "METERS", default_value_t = DEFAULT_BORDER)]
    pub border: f64,
}

impl GridArgs {
    /// Builds an indexer with the origin already set.
    #[must_use]
    pub fn indexer(&self) -> GridIndexer {
        let mut indexer = GridIndexer::new(self.cell_size.into());
        indexer.set_origin(self.origin_x, self.origin_y);
        indexer
    }
}

/// Input and output tables.
#[derive(Debug, Clone, clap::Args)]
pub struct TableArgs {
    /// Input CSV file with a header row.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output CSV file. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Field delimiter of both tables.
    #[arg(long, value_name = "CHAR", default_value_t = ',')]
    pub delimiter: char,

    /// Name of the X coordinate column.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_X_COLUMN)]
    pub x_column: String,

    /// Name of the Y coordinate column.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_Y_COLUMN)]
    pub y_column: String,
}

impl TableArgs {
    /// The delimiter as a byte.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidDelimiter`] for non-ASCII delimiters.
    pub fn delimiter_byte(&self) -> Result<u8, AppError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(AppError::InvalidDelimiter {
                delimiter: self.delimiter,
            })
    }
}

/// Street name handling.
#[derive(Debug, Clone, clap::Args)]
pub struct StreetArgs {
    /// Street type token recognized by the formatter. Repeatable; replaces the default set.
    #[arg(long = "street-type", value_name = "TOKEN")]
    pub street_types: Vec<String>,
}

impl StreetArgs {
    /// Builds the street formatter.
    #[must_use]
    pub fn formatter(&self) -> StreetFormatter {
        if self.street_types.is_empty() {
            StreetFormatter::default()
        } else {
            StreetFormatter::new(StreetTypes::new(&self.street_types))
        }
    }
}

/// Arguments of `index`.
#[derive(Debug, Clone, clap::Args)]
pub struct IndexArgs {
    /// Grid configuration.
    #[command(flatten)]
    pub grid: GridArgs,

    /// Input and output tables.
    #[command(flatten)]
    pub table: TableArgs,

    /// Street name handling.
    #[command(flatten)]
    pub streets: StreetArgs,

    /// Name of the street column.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_STREET_COLUMN)]
    pub street_column: String,

    /// Index points without aggregating them by street.
    #[arg(long, conflicts_with = "street_column")]
    pub no_street: bool,

    /// Print the first rows of the result to standard error.
    #[arg(long, value_name = "ROWS")]
    pub preview: Option<usize>,
}

impl IndexArgs {
    /// The columns to read.
    #[must_use]
    pub fn columns(&self) -> ColumnSpec {
        ColumnSpec {
            x: self.table.x_column.clone(),
            y: self.table.y_column.clone(),
            street: (!self.no_street).then(|| self.street_column.clone()),
        }
    }
}

/// Arguments of `annotate`.
#[derive(Debug, Clone, clap::Args)]
pub struct AnnotateArgs {
    /// Grid configuration.
    #[command(flatten)]
    pub grid: GridArgs,

    /// Input and output tables.
    #[command(flatten)]
    pub table: TableArgs,
}

/// Arguments of `point`.
#[derive(Debug, Clone, clap::Args)]
pub struct PointArgs {
    /// Grid configuration.
    #[command(flatten)]
    pub grid: GridArgs,

    /// Street name handling.
    #[command(flatten)]
    pub streets: StreetArgs,

    /// X coordinate of the point.
    #[arg(short, value_name = "X", allow_negative_numbers = true)]
    pub x: f64,

    /// Y coordinate of the point.
    #[arg(short, value_name = "Y", allow_negative_numbers = true)]
    pub y: f64,

    /// Raw street name to format alongside the point.
    #[arg(long, value_name = "NAME")]
    pub street: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nomenclator").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_index_defaults() {
        let cli = parse(&[
            "index",
            "--input",
            "points.csv",
            "--origin-x",
            "5946000",
            "--origin-y",
            "5417000",
        ]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(args.grid.cell_size.get(), 500);
        assert!((args.grid.border - DEFAULT_BORDER).abs() < f64::EPSILON);
        assert_eq!(args.columns(), ColumnSpec::default());
        assert_eq!(args.table.output, None);
        assert_eq!(args.table.delimiter_byte().unwrap(), b',');
        assert_eq!(args.preview, None);
        assert_eq!(args.streets.formatter().format("УЛ. Мира"), "Мира, ул.");
    }

    #[test]
    fn test_index_options() {
        let cli = parse(&[
            "index",
            "-i",
            "points.csv",
            "-o",
            "index.csv",
            "--origin-x",
            "-100.5",
            "--origin-y",
            "0",
            "--no-street",
            "--x-column",
            "EAST",
            "--cell-size",
            "1000",
            "--delimiter",
            ";",
            "--street-type",
            "ST.",
            "--preview",
            "10",
        ]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert!((args.grid.origin_x + 100.5).abs() < f64::EPSILON);
        assert_eq!(args.grid.indexer().cell_size().get(), 1000);
        assert_eq!(
            args.columns(),
            ColumnSpec {
                x: "EAST".to_owned(),
                y: "Y".to_owned(),
                street: None,
            }
        );
        assert_eq!(args.table.delimiter_byte().unwrap(), b';');
        assert_eq!(args.preview, Some(10));
        assert_eq!(args.streets.formatter().format("ST. Baker"), "Baker, st.");
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let result = Cli::try_parse_from([
            "nomenclator",
            "point",
            "--origin-x",
            "0",
            "--origin-y",
            "0",
            "--cell-size",
            "0",
            "-x",
            "1",
            "-y",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_ascii_delimiter() {
        let cli = parse(&[
            "annotate",
            "--input",
            "points.csv",
            "--origin-x",
            "0",
            "--origin-y",
            "0",
            "--delimiter",
            "ж",
        ]);
        let Command::Annotate(args) = cli.command else {
            panic!("expected annotate command");
        };
        assert!(matches!(
            args.table.delimiter_byte(),
            Err(AppError::InvalidDelimiter { delimiter: 'ж' })
        ));
    }
}
