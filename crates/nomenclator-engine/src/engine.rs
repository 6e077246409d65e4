use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use nomenclator_core::{
    DEFAULT_BORDER, GridIndexer, IndexError, NomenclaturalIndex, Point, SheetNumber,
};
use nomenclator_street::StreetFormatter;

use crate::{
    ColumnSpec, InputRow, OutputRecord, RecordContent, RecordTable, RowConversionError, RowError,
    RowId, Uniqueness,
    group::{StreetGroup, StreetGroups},
    record,
};

/// Lifecycle of one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum RunState {
    /// No run has started.
    #[default]
    Idle,
    /// Rows are being indexed and grouped by street.
    Pass1Running,
    /// Street groups are being merged into final labels.
    Pass2Running,
    /// Records are being deduplicated and sorted.
    Finalizing,
    /// The last run produced a result.
    Done,
    /// The last run stopped on a structural error or was cancelled.
    Failed,
}

/// Errors that abort a whole run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    /// The indexer has no origin.
    #[display("coordinate origin is not set")]
    OriginNotSet,
    /// An X or Y column is absent from the table.
    #[display("coordinate columns {x:?} and {y:?} are required")]
    MissingCoordinateColumns {
        /// Configured X column.
        x: String,
        /// Configured Y column.
        y: String,
    },
    /// The configured street column is absent from the table.
    #[display("street column {name:?} not found")]
    MissingStreetColumn {
        /// Configured street column.
        name: String,
    },
    /// The run was cancelled through its [`CancelToken`].
    #[display("run cancelled")]
    Cancelled,
}

/// Per-run options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Whether the rows carry a street column.
    pub with_streets: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { with_streets: true }
    }
}

/// Pass 1 progress, reported after each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Rows processed so far.
    pub processed: usize,
    /// Total number of rows.
    pub total: usize,
}

impl Progress {
    /// Completion as a whole percentage, rounded down.
    #[must_use]
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let percent = self.processed.min(self.total) * 100 / self.total;
        u8::try_from(percent).unwrap_or(100)
    }
}

/// Shared flag used to abandon a run at the next row boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of indexing a single point.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRow {
    /// Letter-number label of the point's cell.
    pub index: NomenclaturalIndex,
    /// Sheet the point belongs to.
    pub sheet: SheetNumber,
    /// Formatted street, when a raw street was given.
    pub street: Option<String>,
}

/// Indexes one point and formats its street, outside of any aggregation.
///
/// # Errors
///
/// Returns [`IndexError::OriginNotSet`] if the indexer has no origin and
/// [`IndexError::NonFinite`] for coordinates outside the grid.
///
/// # Examples
///
/// ```
/// use nomenclator_core::{DEFAULT_BORDER, GridIndexer};
/// use nomenclator_engine::compute_row;
/// use nomenclator_street::StreetFormatter;
///
/// let mut indexer = GridIndexer::default();
/// indexer.set_origin(5_946_000.0, 5_417_000.0);
/// let formatter = StreetFormatter::default();
///
/// let row = compute_row(
///     &indexer,
///     &formatter,
///     DEFAULT_BORDER,
///     5_940_191.697,
///     5_422_057.239,
///     Some("УЛ. Якуба Коласа"),
/// )?;
/// assert_eq!(row.index.to_string(), "М-11");
/// assert_eq!(row.sheet.to_string(), "Лист 4");
/// assert_eq!(row.street.as_deref(), Some("Якуба коласа, ул."));
/// # Ok::<(), nomenclator_core::IndexError>(())
/// ```
pub fn compute_row(
    indexer: &GridIndexer,
    formatter: &StreetFormatter,
    border: f64,
    x: f64,
    y: f64,
    street: Option<&str>,
) -> Result<ComputedRow, IndexError> {
    let location = indexer.locate(Point::new(x, y), border)?;
    Ok(ComputedRow {
        index: location.index,
        sheet: location.sheet,
        street: street.map(|raw| formatter.format(raw)),
    })
}

/// One row after pass 1.
#[derive(Debug)]
struct Pass1Row<'r> {
    row: RowId,
    raw_street: &'r str,
    result: Result<Indexed, RowError>,
}

#[derive(Debug)]
struct Indexed {
    index: String,
    sheet: SheetNumber,
    street: String,
}

/// Runs the two-pass aggregation over a set of rows.
///
/// Pass 1 indexes every row and groups the labels by raw street name. Pass 2
/// replaces each row's label with its street's merged label and classifies
/// the street's uniqueness. The records are then deduplicated on
/// `(street, label)` and stable-sorted by street.
///
/// The engine borrows the indexer for its whole lifetime, so the origin
/// cannot change during a run.
///
/// # Examples
///
/// ```
/// use nomenclator_core::GridIndexer;
/// use nomenclator_engine::{AggregationEngine, InputRow, RunOptions};
/// use nomenclator_street::StreetFormatter;
///
/// let mut indexer = GridIndexer::default();
/// indexer.set_origin(5_946_000.0, 5_417_000.0);
/// let formatter = StreetFormatter::default();
///
/// let rows = [
///     InputRow::new(5_940_191.697, 5_422_057.239).with_street("УЛ. Якуба Коласа"),
///     InputRow::new(5_944_000.0, 5_418_000.0).with_street("УЛ. Якуба Коласа"),
/// ];
/// let mut engine = AggregationEngine::new(&indexer, &formatter);
/// let records = engine.run(&rows, RunOptions::default(), |_| {})?;
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].final_index(), Some("Д-3; М-11"));
/// assert_eq!(records[0].street(), Some("Якуба коласа, ул."));
/// # Ok::<(), nomenclator_engine::EngineError>(())
/// ```
#[derive(Debug)]
pub struct AggregationEngine<'a> {
    indexer: &'a GridIndexer,
    formatter: &'a StreetFormatter,
    border: f64,
    cancel: CancelToken,
    state: RunState,
}

impl<'a> AggregationEngine<'a> {
    /// Creates an engine using the default sheet border.
    #[must_use]
    pub fn new(indexer: &'a GridIndexer, formatter: &'a StreetFormatter) -> Self {
        Self {
            indexer,
            formatter,
            border: DEFAULT_BORDER,
            cancel: CancelToken::new(),
            state: RunState::Idle,
        }
    }

    /// Sets the X distance separating near and far sheets.
    #[must_use]
    pub fn with_border(mut self, border: f64) -> Self {
        self.border = border;
        self
    }

    /// Uses `cancel` to abandon runs.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the state of the current or last run.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Selects the configured columns of `table` and runs the aggregation.
    ///
    /// # Errors
    ///
    /// Returns the column errors of [`RecordTable::select`], or any error of
    /// [`run`](Self::run).
    pub fn run_table(
        &mut self,
        table: &RecordTable,
        columns: &ColumnSpec,
        progress: impl FnMut(Progress),
    ) -> Result<Vec<OutputRecord>, EngineError> {
        let rows = match table.select(columns) {
            Ok(rows) => rows,
            Err(error) => return Err(self.fail(error)),
        };
        self.run(&rows, columns.run_options(), progress)
    }

    /// Runs the aggregation over `rows`, calling `progress` after each row of
    /// the first pass.
    ///
    /// Rows whose coordinates cannot be indexed collapse into one
    /// [`RecordContent::Failed`] record, sorted under [`ERROR_MARKER`](crate::ERROR_MARKER).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OriginNotSet`] if the indexer has no origin and
    /// [`EngineError::Cancelled`] if the cancel token fires. No partial
    /// output is returned in either case.
    pub fn run(
        &mut self,
        rows: &[InputRow],
        options: RunOptions,
        mut progress: impl FnMut(Progress),
    ) -> Result<Vec<OutputRecord>, EngineError> {
        if !self.indexer.has_origin() {
            return Err(self.fail(EngineError::OriginNotSet));
        }

        self.transition(RunState::Pass1Running);
        let total = rows.len();
        let mut groups = StreetGroups::default();
        let mut buffered = Vec::with_capacity(total);
        for (position, input) in rows.iter().enumerate() {
            self.check_cancelled()?;
            let row = RowId::new(position);
            let pass1 = self.index_row(row, input, options, &mut groups);
            buffered.push(pass1);
            progress(Progress {
                processed: position + 1,
                total,
            });
        }
        log::debug!(
            "pass 1 done: {total} rows, {} streets, {} failed",
            groups.len(),
            buffered.iter().filter(|row| row.result.is_err()).count()
        );

        self.transition(RunState::Pass2Running);
        let mut records = Vec::with_capacity(total);
        for pass1 in buffered {
            self.check_cancelled()?;
            records.push(merge_row(pass1, options, &groups));
        }

        self.transition(RunState::Finalizing);
        let records = record::finalize(records);
        log::debug!("aggregation done: {} of {total} records kept", records.len());

        self.transition(RunState::Done);
        Ok(records)
    }

    fn index_row<'r>(
        &self,
        row: RowId,
        input: &'r InputRow,
        options: RunOptions,
        groups: &mut StreetGroups,
    ) -> Pass1Row<'r> {
        let raw_street = if options.with_streets {
            input.street.as_deref().unwrap_or("")
        } else {
            ""
        };

        let location = input.point().and_then(|point| {
            self.indexer
                .locate(point, self.border)
                .map_err(RowConversionError::from)
        });
        let result = match location {
            Ok(location) => {
                let index = location.index.to_string();
                let street = if options.with_streets {
                    groups.record(raw_street, index.clone());
                    self.formatter.format(raw_street)
                } else {
                    String::new()
                };
                log::trace!("{row}: {index}, {}", location.sheet);
                Ok(Indexed {
                    index,
                    sheet: location.sheet,
                    street,
                })
            }
            Err(kind) => {
                let error = RowError { row, kind };
                log::warn!("{error}");
                Err(error)
            }
        };

        Pass1Row {
            row,
            raw_street,
            result,
        }
    }

    fn check_cancelled(&mut self) -> Result<(), EngineError> {
        if self.cancel.is_cancelled() {
            return Err(self.fail(EngineError::Cancelled));
        }
        Ok(())
    }

    fn fail(&mut self, error: EngineError) -> EngineError {
        log::debug!("run failed in state {}: {error}", self.state);
        self.state = RunState::Failed;
        error
    }

    fn transition(&mut self, state: RunState) {
        log::debug!("run state: {} -> {state}", self.state);
        self.state = state;
    }
}

fn merge_row(pass1: Pass1Row<'_>, options: RunOptions, groups: &StreetGroups) -> OutputRecord {
    let blank = pass1.raw_street.trim().is_empty();
    let repeated = options.with_streets && !blank && groups.occurrences(pass1.raw_street) > 1;
    let uniqueness = if repeated {
        Uniqueness::Repeated
    } else {
        Uniqueness::Unique
    };

    let content = match pass1.result {
        Ok(Indexed {
            index,
            sheet,
            street,
        }) => {
            let final_index = groups
                .get(pass1.raw_street)
                .filter(|_| options.with_streets)
                .and_then(StreetGroup::merged)
                .unwrap_or(index);
            RecordContent::Indexed {
                final_index,
                sheet,
                street,
            }
        }
        Err(error) => RecordContent::Failed(error),
    };

    OutputRecord {
        row: pass1.row,
        content,
        uniqueness,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::ERROR_MARKER;

    fn indexer() -> GridIndexer {
        let mut indexer = GridIndexer::default();
        indexer.set_origin(5_946_000.0, 5_417_000.0);
        indexer
    }

    fn scenario_rows() -> Vec<InputRow> {
        vec![
            InputRow::new(5_940_191.697, 5_422_057.239).with_street("УЛ. Якуба Коласа"),
            InputRow::new(5_940_100.0, 5_422_100.0).with_street("УЛ. Якуба Коласа"),
            InputRow::new(5_944_000.0, 5_418_000.0).with_street("УЛ. Якуба Коласа"),
            InputRow::new(5_945_900.0, 5_417_100.0).with_street("ПР. Независимости"),
            InputRow::new("abc", 1.0).with_street("ПР. Независимости"),
        ]
    }

    #[test]
    fn test_compute_row() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let row = compute_row(
            &indexer,
            &formatter,
            DEFAULT_BORDER,
            5_940_191.697,
            5_422_057.239,
            None,
        )
        .unwrap();
        assert_eq!(row.index.to_string(), "М-11");
        assert_eq!(row.sheet, SheetNumber::Four);
        assert_eq!(row.street, None);

        let unset = GridIndexer::default();
        assert_eq!(
            compute_row(&unset, &formatter, DEFAULT_BORDER, 0.0, 0.0, Some("УЛ. Мира")),
            Err(IndexError::OriginNotSet)
        );
    }

    #[test]
    fn test_scenario() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let mut engine = AggregationEngine::new(&indexer, &formatter);
        assert_eq!(engine.state(), RunState::Idle);

        let records = engine
            .run(&scenario_rows(), RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(engine.state(), RunState::Done);
        assert_eq!(records.len(), 3);
        let rows: Vec<_> = records.iter().map(|record| record.row.position()).collect();
        assert_eq!(rows, [3, 4, 0]);

        assert_eq!(records[0].row, RowId::new(3));
        assert_eq!(records[0].final_index(), Some("А-1"));
        assert_eq!(records[0].sheet(), Some(SheetNumber::One));
        assert_eq!(records[0].street(), Some("Независимости, пр."));
        assert_eq!(records[0].uniqueness, Uniqueness::Unique);

        // Sorted under the error marker, between the two streets.
        assert_eq!(
            records[1].error().map(|error| &error.kind),
            Some(&RowConversionError::InvalidX {
                value: "abc".to_owned()
            })
        );
        // The failed row does not count towards its street.
        assert_eq!(records[1].uniqueness, Uniqueness::Unique);

        // Rows 1 and 2 share row 0's street and merged label.
        assert_eq!(records[2].row, RowId::new(0));
        assert_eq!(records[2].final_index(), Some("Д-3; М-11"));
        assert_eq!(records[2].sheet(), Some(SheetNumber::Four));
        assert_eq!(records[2].street(), Some("Якуба коласа, ул."));
        assert_eq!(records[2].uniqueness, Uniqueness::Repeated);
    }

    #[test]
    fn test_duplicate_points_collapse() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [
            InputRow::new(5_945_900.0, 5_417_100.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_800.0, 5_417_200.0).with_street("УЛ. Мира"),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_index(), Some("А-1"));
        assert_eq!(records[0].uniqueness, Uniqueness::Repeated);
    }

    #[test]
    fn test_common_letter_merge() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        // Same column, rows 1, 2 and 3.
        let rows = [
            InputRow::new(5_945_900.0, 5_418_100.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_900.0, 5_417_100.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_900.0, 5_417_600.0).with_street("УЛ. Мира"),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_index(), Some("А-1, 2, 3"));
    }

    #[test]
    fn test_untrimmed_street_names() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [
            InputRow::new(5_945_900.0, 5_417_100.0).with_street(" УЛ. Мира "),
            InputRow::new(5_945_900.0, 5_417_600.0).with_street(" УЛ. Мира "),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_index(), Some("А-1, 2"));
        assert_eq!(records[0].street(), Some("Мира, ул."));
        assert_eq!(records[0].uniqueness, Uniqueness::Repeated);
    }

    #[test]
    fn test_padding_separates_raw_names() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [
            InputRow::new(5_945_900.0, 5_417_100.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_900.0, 5_417_600.0).with_street(" УЛ. Мира"),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        // Same formatted street, but two raw names seen once each.
        let labels: Vec<_> = records.iter().filter_map(OutputRecord::final_index).collect();
        assert_eq!(labels, ["А-1", "А-2"]);
        assert!(records.iter().all(|record| record.uniqueness.is_unique()));
    }

    #[test]
    fn test_single_number_keeps_own_labels() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        // Columns А and Б of row 1.
        let rows = [
            InputRow::new(5_945_900.0, 5_417_100.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_400.0, 5_417_100.0).with_street("УЛ. Мира"),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        let labels: Vec<_> = records.iter().filter_map(OutputRecord::final_index).collect();
        assert_eq!(labels, ["А-1", "Б-1"]);
        assert!(records.iter().all(|record| record.uniqueness.is_repeated()));
    }

    #[test]
    fn test_failed_rows_collapse() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [
            InputRow::new("x", 0.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_900.0, 5_417_100.0).with_street("УЛ. Мира"),
            InputRow::new("y", 0.0).with_street("УЛ. Мира"),
            InputRow::new("z", 0.0).with_street("ПР. Независимости"),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        let failed: Vec<_> = records
            .iter()
            .filter_map(OutputRecord::error)
            .map(|error| error.row)
            .collect();
        assert_eq!(failed, [RowId::new(0)]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].street(), Some("Мира, ул."));
    }

    #[test]
    fn test_without_streets() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [
            InputRow::new(5_945_900.0, 5_418_100.0).with_street("УЛ. Мира"),
            InputRow::new(5_945_900.0, 5_417_100.0),
            InputRow::new(5_945_800.0, 5_417_200.0),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions { with_streets: false }, |_| {})
            .unwrap();
        let labels: Vec<_> = records.iter().filter_map(OutputRecord::final_index).collect();
        assert_eq!(labels, ["А-3", "А-1"]);
        assert!(records.iter().all(|record| record.street() == Some("")));
        assert!(records.iter().all(|record| record.uniqueness.is_unique()));
    }

    #[test]
    fn test_missing_street_is_blank() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [
            InputRow::new(5_945_900.0, 5_417_100.0),
            InputRow::new(5_945_900.0, 5_417_600.0),
        ];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_index(), Some("А-1, 2"));
        assert_eq!(records[0].street(), Some(""));
        assert_eq!(records[0].uniqueness, Uniqueness::Unique);
    }

    #[test]
    fn test_origin_not_set() {
        let indexer = GridIndexer::default();
        let formatter = StreetFormatter::default();
        let mut engine = AggregationEngine::new(&indexer, &formatter);
        let mut calls = 0;
        let result = engine.run(&scenario_rows(), RunOptions::default(), |_| calls += 1);
        assert_eq!(result, Err(EngineError::OriginNotSet));
        assert_eq!(engine.state(), RunState::Failed);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_run_table() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let mut table = RecordTable::new(["X", "Y", "SEM9"]);
        table.push_row(["5940191.697", "5422057.239", "УЛ. Якуба Коласа"]);
        table.push_row(["5944000", "5418000", "УЛ. Якуба Коласа"]);

        let mut engine = AggregationEngine::new(&indexer, &formatter);
        let records = engine
            .run_table(&table, &ColumnSpec::default(), |_| {})
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_index(), Some("Д-3; М-11"));

        let columns = ColumnSpec {
            street: Some("STREET".to_owned()),
            ..ColumnSpec::default()
        };
        let result = engine.run_table(&table, &columns, |_| {});
        assert!(matches!(result, Err(EngineError::MissingStreetColumn { .. })));
        assert_eq!(engine.state(), RunState::Failed);
    }

    #[test]
    fn test_non_finite_row_is_a_row_error() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [InputRow::new(f64::NAN, 0.0), InputRow::new("inf", 0.0)];
        let records = AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(matches!(
            records[0].error().map(|error| &error.kind),
            Some(RowConversionError::Index(IndexError::NonFinite { .. }))
        ));
    }

    #[test]
    fn test_progress_is_monotone_and_complete() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = scenario_rows();
        let mut reports = Vec::new();
        AggregationEngine::new(&indexer, &formatter)
            .run(&rows, RunOptions::default(), |progress| {
                reports.push(progress.percent());
            })
            .unwrap();
        assert_eq!(reports, [20, 40, 60, 80, 100]);
    }

    #[test]
    fn test_progress_percent() {
        let progress = |processed, total| Progress { processed, total }.percent();
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(2, 3), 66);
        assert_eq!(progress(3, 3), 100);
        assert_eq!(progress(0, 0), 100);
    }

    #[test]
    fn test_cancellation_discards_output() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let cancel = CancelToken::new();
        let mut engine =
            AggregationEngine::new(&indexer, &formatter).with_cancel_token(cancel.clone());
        let result = engine.run(&scenario_rows(), RunOptions::default(), |progress| {
            if progress.processed == 2 {
                cancel.cancel();
            }
        });
        assert_eq!(result, Err(EngineError::Cancelled));
        assert_eq!(engine.state(), RunState::Failed);
    }

    #[test]
    fn test_custom_border() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let rows = [InputRow::new(5_940_191.697, 5_422_057.239)];
        let records = AggregationEngine::new(&indexer, &formatter)
            .with_border(10_000.0)
            .run(&rows, RunOptions::default(), |_| {})
            .unwrap();
        assert_eq!(records[0].sheet(), Some(SheetNumber::Two));
    }

    #[test]
    fn test_engine_can_run_again() {
        let indexer = indexer();
        let formatter = StreetFormatter::default();
        let mut engine = AggregationEngine::new(&indexer, &formatter);
        let first = engine.run(&scenario_rows(), RunOptions::default(), |_| {});
        let second = engine.run(&scenario_rows(), RunOptions::default(), |_| {});
        assert_eq!(first, second);
        assert_eq!(engine.state(), RunState::Done);
    }

    fn street(record: &OutputRecord) -> &str {
        record.street().unwrap_or(ERROR_MARKER)
    }

    fn arb_row() -> impl Strategy<Value = InputRow> {
        (
            prop::option::weighted(0.9, -20_000.0..20_000.0f64),
            -20_000.0..20_000.0f64,
            prop::option::of(prop::sample::select(vec![
                "УЛ. Мира",
                "ПР. Независимости",
                "2-й ПЕР. Ленина",
                " УЛ. Мира",
                "",
            ])),
        )
            .prop_map(|(dx, dy, street)| {
                let row = match dx {
                    Some(dx) => InputRow::new(5_946_000.0 + dx, 5_417_000.0 + dy),
                    None => InputRow::new("?", dy),
                };
                match street {
                    Some(street) => row.with_street(street),
                    None => row,
                }
            })
    }

    proptest! {
        #[test]
        fn prop_output_is_deduplicated_and_sorted(
            rows in prop::collection::vec(arb_row(), 0..60),
            with_streets in any::<bool>(),
        ) {
            let indexer = indexer();
            let formatter = StreetFormatter::default();
            let records = AggregationEngine::new(&indexer, &formatter)
                .run(&rows, RunOptions { with_streets }, |_| {})
                .unwrap();

            let mut pairs = HashSet::new();
            for record in &records {
                if let (Some(street), Some(index)) = (record.street(), record.final_index()) {
                    prop_assert!(pairs.insert((street, index)));
                }
            }

            prop_assert!(records.iter().filter(|record| record.content.is_failed()).count() <= 1);

            for pair in records.windows(2) {
                prop_assert!(street(&pair[0]) <= street(&pair[1]));
                if street(&pair[0]) == street(&pair[1]) {
                    prop_assert!(pair[0].row < pair[1].row);
                }
            }
        }

        #[test]
        fn prop_progress_is_monotone(rows in prop::collection::vec(arb_row(), 1..40)) {
            let indexer = indexer();
            let formatter = StreetFormatter::default();
            let mut reports = Vec::new();
            AggregationEngine::new(&indexer, &formatter)
                .run(&rows, RunOptions::default(), |progress| reports.push(progress.percent()))
                .unwrap();
            prop_assert_eq!(reports.len(), rows.len());
            prop_assert!(reports.windows(2).all(|pair| pair[0] <= pair[1]));
            prop_assert_eq!(reports.last().copied(), Some(100));
        }
    }
}
