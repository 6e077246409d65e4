use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::Path,
};

use nomenclator_engine::{ColumnSpec, OutputRecord, compute_row};

use crate::{
    AnnotateArgs, AppError, Cli, Command, IndexArgs, PointArgs,
    cli::TableArgs,
    table_io::{self, IndexRow},
    worker::{self, RunRequest},
};

/// Runs the parsed command.
///
/// # Errors
///
/// Returns the first error that stops the command.
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Index(args) => run_index(&args),
        Command::Annotate(args) => run_annotate(&args),
        Command::Point(args) => run_point(&args),
    }
}

fn run_index(args: &IndexArgs) -> Result<(), AppError> {
    let delimiter = args.table.delimiter_byte()?;
    let table = table_io::read_table(open_input(&args.table.input)?, delimiter)?;
    log::info!(
        "indexing {} rows from {}",
        table.len(),
        args.table.input.display()
    );

    let handle = worker::spawn(RunRequest {
        indexer: args.grid.indexer(),
        formatter: args.streets.formatter(),
        border: args.grid.border,
        table,
        columns: args.columns(),
    });
    let records = handle.wait(|progress| log::info!("progress: {}%", progress.percent()))?;
    log::info!("{} index rows", records.len());

    if let Some(rows) = args.preview {
        print_preview(&records, rows)?;
    }
    table_io::write_index(create_output(&args.table)?, delimiter, &records)?;
    Ok(())
}

fn run_annotate(args: &AnnotateArgs) -> Result<(), AppError> {
    let delimiter = args.table.delimiter_byte()?;
    let table = table_io::read_table(open_input(&args.table.input)?, delimiter)?;
    let columns = ColumnSpec {
        x: args.table.x_column.clone(),
        y: args.table.y_column.clone(),
        street: None,
    };
    table_io::write_annotated(
        create_output(&args.table)?,
        delimiter,
        &table,
        &columns,
        &args.grid.indexer(),
        args.grid.border,
    )
}

fn run_point(args: &PointArgs) -> Result<(), AppError> {
    let row = compute_row(
        &args.grid.indexer(),
        &args.streets.formatter(),
        args.grid.border,
        args.x,
        args.y,
        args.street.as_deref(),
    )?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Координаты: X={}, Y={}", args.x, args.y)?;
    writeln!(stdout, "Номенклатурный индекс: {}", row.index)?;
    writeln!(stdout, "Лист карты: {}", row.sheet)?;
    if let Some(street) = row.street {
        writeln!(stdout, "Улица: {street}")?;
    }
    Ok(())
}

fn print_preview(records: &[OutputRecord], rows: usize) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{}", table_io::INDEX_HEADERS.join(" | "))?;
    for record in records.iter().take(rows) {
        let IndexRow {
            index,
            sheet,
            street,
            uniqueness,
        } = IndexRow::from(record);
        writeln!(stderr, "{index} | {sheet} | {street} | {uniqueness}")?;
    }
    if records.len() > rows {
        writeln!(stderr, "... {} more", records.len() - rows)?;
    }
    Ok(())
}

fn open_input(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

fn create_output(table: &TableArgs) -> io::Result<Box<dyn io::Write>> {
    Ok(match &table.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}
