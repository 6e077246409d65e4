//! Sheet labels derived from a grid cell.

use std::fmt::{self, Display};

/// Letter-number label of a grid square, rendered as `"<Letter>-<Number>"`.
///
/// The letter names the column, the number is the 1-based row.
///
/// # Examples
///
/// ```
/// use nomenclator_core::NomenclaturalIndex;
///
/// let index = NomenclaturalIndex::new('М', 11);
/// assert_eq!(index.to_string(), "М-11");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NomenclaturalIndex {
    letter: char,
    number: i64,
}

impl NomenclaturalIndex {
    /// Creates an index from a column letter and a 1-based row number.
    #[must_use]
    pub const fn new(letter: char, number: i64) -> Self {
        Self { letter, number }
    }

    /// Returns the column letter.
    #[must_use]
    pub const fn letter(self) -> char {
        self.letter
    }

    /// Returns the 1-based row number.
    #[must_use]
    pub const fn number(self) -> i64 {
        self.number
    }
}

impl Display for NomenclaturalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.letter, self.number)
    }
}

/// Map sheet a point is printed on.
///
/// The map is split into four sheets by two cuts: the row number
/// (rows `1..=9` versus the rest) and the X distance from the origin
/// (up to the border versus beyond it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum SheetNumber {
    /// Rows up to 9, within the border.
    #[display("Лист 1")]
    One,
    /// Rows after 9, within the border.
    #[display("Лист 2")]
    Two,
    /// Rows up to 9, beyond the border.
    #[display("Лист 3")]
    Three,
    /// Rows after 9, beyond the border.
    #[display("Лист 4")]
    Four,
}

impl SheetNumber {
    /// All sheets in label order.
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Picks the sheet for a 1-based row number and an X distance from the origin.
    #[must_use]
    pub fn classify(number: i64, delta_x: f64, border: f64) -> Self {
        match (number <= 9, delta_x <= border) {
            (true, true) => Self::One,
            (true, false) => Self::Three,
            (false, true) => Self::Two,
            (false, false) => Self::Four,
        }
    }
}
