//! Input rows and per-row conversion errors.

use std::fmt::{self, Display};

use nomenclator_core::{IndexError, Point};

/// Stable identifier of an input row: its 0-based position in the input.
///
/// Displayed 1-based, the way rows are counted in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(usize);

impl RowId {
    /// Creates a row id from a 0-based position.
    #[must_use]
    pub const fn new(position: usize) -> Self {
        Self(position)
    }

    /// Returns the 0-based position.
    #[must_use]
    pub const fn position(self) -> usize {
        self.0
    }
}

impl Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.0 + 1)
    }
}

/// A raw cell value as produced by a record source.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum CellValue {
    /// A numeric cell.
    Number(f64),
    /// A text cell, parsed as a number when a coordinate is needed.
    Text(String),
    /// A blank cell.
    Empty,
}

impl CellValue {
    /// Reads the cell as a real number.
    ///
    /// Text is trimmed and parsed; blank cells and unparsable text give `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Empty => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        if text.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(text.to_owned())
        }
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        if text.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(text)
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => Display::fmt(value, f),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

/// One input record: two coordinates and an optional raw street name.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    /// X coordinate cell.
    pub x: CellValue,
    /// Y coordinate cell.
    pub y: CellValue,
    /// Raw street name, untrimmed and unformatted.
    pub street: Option<String>,
}

impl InputRow {
    /// Creates a row without a street.
    pub fn new(x: impl Into<CellValue>, y: impl Into<CellValue>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            street: None,
        }
    }

    /// Attaches a raw street name.
    #[must_use]
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    /// Parses both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`RowConversionError::InvalidX`] or
    /// [`RowConversionError::InvalidY`] if a coordinate is not a number.
    pub fn point(&self) -> Result<Point, RowConversionError> {
        let x = self
            .x
            .as_f64()
            .ok_or_else(|| RowConversionError::InvalidX {
                value: self.x.to_string(),
            })?;
        let y = self
            .y
            .as_f64()
            .ok_or_else(|| RowConversionError::InvalidY {
                value: self.y.to_string(),
            })?;
        Ok(Point::new(x, y))
    }
}

/// Why a single row could not be indexed.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RowConversionError {
    /// The X cell is not a number.
    #[display("X value {value:?} is not a number")]
    InvalidX {
        /// The cell as text.
        value: String,
    },
    /// The Y cell is not a number.
    #[display("Y value {value:?} is not a number")]
    InvalidY {
        /// The cell as text.
        value: String,
    },
    /// The coordinates parsed but could not be indexed.
    #[display("{_0}")]
    #[from]
    Index(IndexError),
}

/// A row that failed conversion. It keeps its slot in the output.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("{row}: {kind}")]
pub struct RowError {
    /// The failed row.
    pub row: RowId,
    /// The failure.
    #[error(source)]
    pub kind: RowConversionError,
}
