use crate::{Alphabet, CellSize, GridCell, NomenclaturalIndex, Origin, Point, SheetNumber};

/// Default X distance from the origin separating the near and far sheets.
pub const DEFAULT_BORDER: f64 = 4500.0;

/// 2^63, the first `f64` past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Errors produced while indexing a point.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum IndexError {
    /// No origin has been set on the indexer.
    #[display("coordinate origin is not set")]
    OriginNotSet,
    /// The point, or its offset from the origin in cells, is not a finite number.
    #[display("coordinates are not finite: {point}")]
    NonFinite {
        /// The rejected point.
        point: Point,
    },
}

/// Everything derived from one point in a single cell computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// The grid cell the point falls into.
    pub cell: GridCell,
    /// `origin.x - point.x`.
    pub delta_x: f64,
    /// `point.y - origin.y`.
    pub delta_y: f64,
    /// Letter-number label of the cell.
    pub index: NomenclaturalIndex,
    /// Sheet the point belongs to.
    pub sheet: SheetNumber,
}

/// Maps points to grid cells, sheet labels and sheet numbers.
///
/// The indexer is configured with a cell size and an alphabet at
/// construction. The origin is set afterwards and must be present before
/// any point is indexed.
///
/// # Examples
///
/// ```
/// use nomenclator_core::{CellSize, GridIndexer, Point};
///
/// let mut indexer = GridIndexer::new(CellSize::DEFAULT);
/// indexer.set_origin(5_946_000.0, 5_417_000.0);
///
/// let point = Point::new(5_940_191.697, 5_422_057.239);
/// let index = indexer.nomenclatural_index(point)?;
/// assert_eq!(index.to_string(), "М-11");
/// # Ok::<(), nomenclator_core::IndexError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridIndexer {
    cell_size: CellSize,
    alphabet: Alphabet,
    origin: Option<Origin>,
}

impl Default for GridIndexer {
    fn default() -> Self {
        Self::new(CellSize::DEFAULT)
    }
}

impl GridIndexer {
    /// Creates an indexer with the standard alphabet and no origin.
    #[must_use]
    pub fn new(cell_size: CellSize) -> Self {
        Self::with_alphabet(cell_size, Alphabet::default())
    }

    /// Creates an indexer with a custom column alphabet and no origin.
    #[must_use]
    pub fn with_alphabet(cell_size: CellSize, alphabet: Alphabet) -> Self {
        Self {
            cell_size,
            alphabet,
            origin: None,
        }
    }

    /// Sets the origin, replacing any previous one.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        let origin = Origin::new(x, y);
        log::debug!("coordinate origin set: {origin}");
        self.origin = Some(origin);
    }

    /// Returns the origin, if set.
    #[must_use]
    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    /// Returns `true` once an origin has been set.
    #[must_use]
    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    /// Returns the configured cell size.
    #[must_use]
    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Returns the column alphabet.
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the grid cell containing `point`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OriginNotSet`] without an origin, and
    /// [`IndexError::NonFinite`] for points that do not map to a finite cell.
    pub fn cell(&self, point: Point) -> Result<GridCell, IndexError> {
        self.deltas(point).map(|(cell, _, _)| cell)
    }

    /// Returns the letter-number label of the cell containing `point`.
    ///
    /// # Errors
    ///
    /// Same as [`cell`](Self::cell).
    pub fn nomenclatural_index(&self, point: Point) -> Result<NomenclaturalIndex, IndexError> {
        let cell = self.cell(point)?;
        Ok(self.index_for_cell(cell))
    }

    /// Returns the sheet `point` is printed on, splitting columns at `border`.
    ///
    /// # Errors
    ///
    /// Same as [`cell`](Self::cell).
    pub fn sheet_number(&self, point: Point, border: f64) -> Result<SheetNumber, IndexError> {
        self.locate(point, border).map(|location| location.sheet)
    }

    /// Computes the cell once and derives both the label and the sheet.
    ///
    /// # Errors
    ///
    /// Same as [`cell`](Self::cell).
    pub fn locate(&self, point: Point, border: f64) -> Result<Location, IndexError> {
        let (cell, delta_x, delta_y) = self.deltas(point)?;
        Ok(Location {
            cell,
            delta_x,
            delta_y,
            index: self.index_for_cell(cell),
            sheet: SheetNumber::classify(cell.number(), delta_x, border),
        })
    }

    /// Labels an already computed cell.
    #[must_use]
    pub fn index_for_cell(&self, cell: GridCell) -> NomenclaturalIndex {
        NomenclaturalIndex::new(self.alphabet.letter_for_column(cell.col), cell.number())
    }

    fn deltas(&self, point: Point) -> Result<(GridCell, f64, f64), IndexError> {
        let origin = self.origin.ok_or(IndexError::OriginNotSet)?;
        let size = f64::from(self.cell_size.get());
        let delta_x = origin.x - point.x;
        let delta_y = point.y - origin.y;
        let col = floor_div(delta_x, size).ok_or(IndexError::NonFinite { point })?;
        let row = floor_div(delta_y, size).ok_or(IndexError::NonFinite { point })?;
        Ok((GridCell::new(col, row), delta_x, delta_y))
    }
}

/// Floored division, `None` when the quotient is not a representable integer.
fn floor_div(value: f64, divisor: f64) -> Option<i64> {
    let quotient = (value / divisor).floor();
    if quotient.is_finite() && (-I64_LIMIT..I64_LIMIT).contains(&quotient) {
        #[expect(clippy::cast_possible_truncation)]
        let quotient = quotient as i64;
        Some(quotient)
    } else {
        None
    }
}
