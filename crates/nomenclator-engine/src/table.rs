//! In-memory record tables and column selection.

use crate::{CellValue, EngineError, InputRow, RunOptions};

/// Default X column name.
pub const DEFAULT_X_COLUMN: &str = "X";
/// Default Y column name.
pub const DEFAULT_Y_COLUMN: &str = "Y";
/// Default street column name.
pub const DEFAULT_STREET_COLUMN: &str = "SEM9";

/// Names of the columns a run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// X coordinate column.
    pub x: String,
    /// Y coordinate column.
    pub y: String,
    /// Street column, if streets are aggregated.
    pub street: Option<String>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            x: DEFAULT_X_COLUMN.to_owned(),
            y: DEFAULT_Y_COLUMN.to_owned(),
            street: Some(DEFAULT_STREET_COLUMN.to_owned()),
        }
    }
}

impl ColumnSpec {
    /// Returns a copy that reads no street column.
    #[must_use]
    pub fn without_street(mut self) -> Self {
        self.street = None;
        self
    }

    /// The run options implied by these columns.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            with_streets: self.street.is_some(),
        }
    }
}

/// A header row and the data rows beneath it, as read from a record source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RecordTable {
    /// Creates an empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a data row.
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Returns the header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column named `name`, ignoring surrounding whitespace.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|header| header.trim() == name)
    }

    /// Reads the configured columns of every row.
    ///
    /// Rows shorter than the header read missing cells as empty. A blank
    /// street cell becomes an empty street name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingCoordinateColumns`] if the X or Y column
    /// is absent, and [`EngineError::MissingStreetColumn`] if a configured
    /// street column is absent.
    pub fn select(&self, columns: &ColumnSpec) -> Result<Vec<InputRow>, EngineError> {
        let (Some(x), Some(y)) = (self.column(&columns.x), self.column(&columns.y)) else {
            return Err(EngineError::MissingCoordinateColumns {
                x: columns.x.clone(),
                y: columns.y.clone(),
            });
        };
        let street = columns
            .street
            .as_deref()
            .map(|name| {
                self.column(name)
                    .ok_or_else(|| EngineError::MissingStreetColumn {
                        name: name.to_owned(),
                    })
            })
            .transpose()?;

        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let cell = |i: usize| cells.get(i).cloned().unwrap_or(CellValue::Empty);
                let row = InputRow::new(cell(x), cell(y));
                match street {
                    Some(i) => row.with_street(cell(i).to_string()),
                    None => row,
                }
            })
            .collect();
        Ok(rows)
    }
}
