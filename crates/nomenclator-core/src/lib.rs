//! Grid indexing for map sheet nomenclature.
//!
//! This crate maps projected point coordinates onto a square grid anchored at
//! a chosen origin and labels each square with a letter-number index such as
//! `"М-11"`.
//!
//! # Overview
//!
//! - [`grid`]: points, the origin, the cell size and grid cells.
//! - [`alphabet`]: the cyclic column alphabet.
//! - [`index`]: the letter-number [`NomenclaturalIndex`] and the
//!   four-way [`SheetNumber`].
//! - [`GridIndexer`]: ties them together.
//!
//! Columns count westwards (decreasing X) and rows northwards (increasing Y)
//! from the origin. Both use floored division, so the numbering is
//! continuous across the origin in every direction.
//!
//! # Examples
//!
//! ```
//! use nomenclator_core::{DEFAULT_BORDER, GridIndexer, Point, SheetNumber};
//!
//! let mut indexer = GridIndexer::default();
//! indexer.set_origin(5_946_000.0, 5_417_000.0);
//!
//! let location = indexer.locate(Point::new(5_944_000.0, 5_418_000.0), DEFAULT_BORDER)?;
//! assert_eq!(location.index.to_string(), "Д-3");
//! assert_eq!(location.sheet, SheetNumber::One);
//! # Ok::<(), nomenclator_core::IndexError>(())
//! ```

pub mod alphabet;
pub mod grid;
pub mod index;
mod indexer;

pub use self::{
    alphabet::{Alphabet, AlphabetError},
    grid::{CellSize, GridCell, Origin, Point},
    index::{NomenclaturalIndex, SheetNumber},
    indexer::{DEFAULT_BORDER, GridIndexer, IndexError, Location},
};
