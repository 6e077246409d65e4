//! Two-pass aggregation of grid indices by street.
//!
//! [`AggregationEngine`] takes ordered [`InputRow`]s and produces the rows of
//! a street index:
//!
//! 1. Pass 1 indexes every row with a [`GridIndexer`] and records its label
//!    in a [`StreetGroup`] keyed by the raw street name.
//! 2. Pass 2 replaces each row's label with the street's merged label (see
//!    [`merge_indices`]) and classifies the street's [`Uniqueness`].
//! 3. The records are deduplicated on `(street, label)` and stable-sorted by
//!    street.
//!
//! Rows whose coordinates are invalid become [`RecordContent::Failed`]
//! records, collapsed into one and sorted under [`ERROR_MARKER`]. Only
//! structural problems abort a run with an [`EngineError`].
//!
//! [`GridIndexer`]: nomenclator_core::GridIndexer

mod engine;
mod group;
mod merge;
mod record;
mod row;
mod table;

pub use self::{
    engine::{
        AggregationEngine, CancelToken, ComputedRow, EngineError, Progress, RunOptions, RunState,
        compute_row,
    },
    group::StreetGroup,
    merge::merge_indices,
    record::{ERROR_MARKER, OutputRecord, RecordContent, Uniqueness},
    row::{CellValue, InputRow, RowConversionError, RowError, RowId},
    table::{
        ColumnSpec, DEFAULT_STREET_COLUMN, DEFAULT_X_COLUMN, DEFAULT_Y_COLUMN, RecordTable,
    },
};
