//! Coordinates and grid cells.

use std::{
    fmt::{self, Display},
    num::NonZeroU32,
};

/// A point in the projected coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X={}, Y={}", self.x, self.y)
    }
}

/// The reference point every grid computation is relative to.
///
/// Columns grow as `x` decreases from the origin, rows grow as `y` increases.
pub type Origin = Point;

/// Edge length of one grid square, in coordinate units (meters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellSize(NonZeroU32);

impl CellSize {
    /// The standard 500 m sheet square.
    pub const DEFAULT: Self = Self(NonZeroU32::new(500).unwrap());

    /// Creates a cell size, or `None` if `size` is zero.
    #[must_use]
    pub const fn new(size: u32) -> Option<Self> {
        match NonZeroU32::new(size) {
            Some(size) => Some(Self(size)),
            None => None,
        }
    }

    /// Returns the size in coordinate units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for CellSize {
    fn from(size: NonZeroU32) -> Self {
        Self(size)
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The `(column, row)` a point falls into, both zero at the origin square.
///
/// Indices come from floored division, so they stay continuous across the
/// origin: a point just east of the origin is column `-1`, not `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    /// Column index, counted westwards from the origin.
    pub col: i64,
    /// Row index, counted northwards from the origin.
    pub row: i64,
}

impl GridCell {
    /// Creates a grid cell.
    #[must_use]
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Returns the 1-based row number used in sheet labels.
    #[must_use]
    pub const fn number(self) -> i64 {
        self.row.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(CellSize::default().get(), 500);
        assert_eq!(CellSize::new(250).map(CellSize::get), Some(250));
        assert_eq!(CellSize::new(0), None);
        assert_eq!(CellSize::DEFAULT.to_string(), "500");
        assert_eq!(CellSize::from(NonZeroU32::MIN).get(), 1);
    }

    #[test]
    fn test_grid_cell_number_is_one_based() {
        assert_eq!(GridCell::new(0, 0).number(), 1);
        assert_eq!(GridCell::new(3, 10).number(), 11);
        assert_eq!(GridCell::new(0, -1).number(), 0);
    }

    #[test]
    fn test_point() {
        let point = Point::from((1.5, -2.0));
        assert_eq!(point, Point::new(1.5, -2.0));
        assert!(point.is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
        assert_eq!(point.to_string(), "X=1.5, Y=-2");
    }
}
