//! Column letters of the sheet grid.

use std::fmt::{self, Display};

/// Letters excluded from the default Cyrillic alphabet.
///
/// Ё lies outside `А..=Я` and is never part of the range.
const EXCLUDED_LETTERS: [char; 4] = ['Й', 'Ъ', 'Ы', 'Ь'];

/// An ordered set of distinct letters used cyclically as grid column labels.
///
/// Column `0` maps to the first letter, column `len` wraps back to it, and
/// negative columns wrap from the end, so every column has a label.
///
/// # Examples
///
/// ```
/// use nomenclator_core::Alphabet;
///
/// let alphabet = Alphabet::default();
/// assert_eq!(alphabet.len(), 28);
/// assert_eq!(alphabet.letter_for_column(0), 'А');
/// assert_eq!(alphabet.letter_for_column(28), 'А');
/// assert_eq!(alphabet.letter_for_column(-1), 'Я');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
}

/// Errors returned when building a custom [`Alphabet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AlphabetError {
    /// The alphabet has no letters.
    #[display("alphabet must contain at least one letter")]
    Empty,
    /// A character that would make index labels ambiguous (a digit, `-` or whitespace).
    #[display("{letter:?} cannot be used as a column letter")]
    InvalidLetter {
        /// The rejected character.
        letter: char,
    },
    /// A letter appears more than once.
    #[display("letter {letter:?} appears more than once in the alphabet")]
    Duplicate {
        /// The repeated letter.
        letter: char,
    },
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::cyrillic()
    }
}

impl Alphabet {
    /// Builds an alphabet from an ordered list of letters.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError::Empty`] for an empty list,
    /// [`AlphabetError::InvalidLetter`] for digits, `-` or whitespace, and
    /// [`AlphabetError::Duplicate`] if any letter is repeated.
    pub fn new(letters: impl IntoIterator<Item = char>) -> Result<Self, AlphabetError> {
        let letters: Vec<char> = letters.into_iter().collect();
        if letters.is_empty() {
            return Err(AlphabetError::Empty);
        }
        for (i, letter) in letters.iter().enumerate() {
            if letter.is_numeric() || letter.is_whitespace() || *letter == '-' {
                return Err(AlphabetError::InvalidLetter { letter: *letter });
            }
            if letters[..i].contains(letter) {
                return Err(AlphabetError::Duplicate { letter: *letter });
            }
        }
        Ok(Self { letters })
    }

    /// The standard sheet alphabet: `А..=Я` without `Й`, `Ъ`, `Ы` and `Ь`.
    #[must_use]
    pub fn cyrillic() -> Self {
        let letters = ('А'..='Я')
            .filter(|c| !EXCLUDED_LETTERS.contains(c))
            .collect();
        Self { letters }
    }

    /// Returns the number of letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Always `false`; an alphabet cannot be built empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Returns the letters in order.
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Returns `true` if `letter` belongs to this alphabet.
    #[must_use]
    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// Returns the label of a grid column.
    ///
    /// Uses a non-negative modulo, so negative columns still select a letter.
    #[must_use]
    pub fn letter_for_column(&self, col: i64) -> char {
        let len = i64::try_from(self.letters.len()).unwrap_or(i64::MAX);
        let i = usize::try_from(col.rem_euclid(len)).unwrap_or_default();
        self.letters[i]
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in &self.letters {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}
