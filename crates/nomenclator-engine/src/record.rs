//! Output records and the final dedup/sort step.

use std::collections::HashSet;

use nomenclator_core::SheetNumber;

use crate::{RowError, RowId};

/// Text shown in place of the index, sheet and street of a failed record.
///
/// Failed records sort among the streets under this name.
pub const ERROR_MARKER: &str = "Ошибка";

/// Whether a raw street name occurs in more than one indexed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum Uniqueness {
    /// The street name occurs once, or is blank.
    #[display("Уникальное")]
    Unique,
    /// The street name occurs in two or more rows.
    #[display("Повторяется")]
    Repeated,
}

/// What a row contributed to the output.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum RecordContent {
    /// The row was indexed.
    Indexed {
        /// The merged label of the row's street, or the row's own label.
        final_index: String,
        /// Sheet the row's point belongs to.
        sheet: SheetNumber,
        /// Formatted street name, empty when no street column is used.
        street: String,
    },
    /// The row's coordinates could not be indexed.
    Failed(RowError),
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// The input row this record came from.
    pub row: RowId,
    /// Indexed values or the row's error.
    pub content: RecordContent,
    /// Uniqueness of the row's raw street name.
    pub uniqueness: Uniqueness,
}

impl OutputRecord {
    /// The final index label, if the row was indexed.
    #[must_use]
    pub fn final_index(&self) -> Option<&str> {
        match &self.content {
            RecordContent::Indexed { final_index, .. } => Some(final_index),
            RecordContent::Failed(_) => None,
        }
    }

    /// The sheet number, if the row was indexed.
    #[must_use]
    pub fn sheet(&self) -> Option<SheetNumber> {
        match &self.content {
            RecordContent::Indexed { sheet, .. } => Some(*sheet),
            RecordContent::Failed(_) => None,
        }
    }

    /// The formatted street, if the row was indexed.
    #[must_use]
    pub fn street(&self) -> Option<&str> {
        match &self.content {
            RecordContent::Indexed { street, .. } => Some(street),
            RecordContent::Failed(_) => None,
        }
    }

    /// The row's error, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&RowError> {
        match &self.content {
            RecordContent::Indexed { .. } => None,
            RecordContent::Failed(error) => Some(error),
        }
    }
}

/// Drops later records repeating an earlier `(street, final_index)` pair and
/// stable-sorts the rest by street.
///
/// All failed records share one pair, so only the first of them is kept. It
/// sorts as if its street were [`ERROR_MARKER`].
pub(crate) fn finalize(records: Vec<OutputRecord>) -> Vec<OutputRecord> {
    let mut seen = HashSet::new();
    let mut records: Vec<OutputRecord> = records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record)))
        .collect();

    records.sort_by(|a, b| sort_street(a).cmp(sort_street(b)));
    records
}

fn dedup_key(record: &OutputRecord) -> Option<(String, String)> {
    match &record.content {
        RecordContent::Indexed {
            final_index,
            street,
            ..
        } => Some((street.clone(), final_index.clone())),
        RecordContent::Failed(_) => None,
    }
}

fn sort_street(record: &OutputRecord) -> &str {
    record.street().unwrap_or(ERROR_MARKER)
}
