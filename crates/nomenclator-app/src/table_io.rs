//! CSV record source and sinks.

use std::io;

use nomenclator_core::GridIndexer;
pub use nomenclator_engine::ERROR_MARKER;
use nomenclator_engine::{ColumnSpec, OutputRecord, RecordContent, RecordTable};

use crate::AppError;

/// Header row of the street index table.
pub const INDEX_HEADERS: [&str; 4] = [
    "Номенклатурный индекс",
    "Лист карты",
    "Форматированная улица",
    "Статус уникальности",
];

/// Header of the appended index column in annotated tables.
pub const ANNOTATED_INDEX_HEADER: &str = "Номенклатурный_индекс";
/// Header of the appended sheet column in annotated tables.
pub const ANNOTATED_SHEET_HEADER: &str = "Лист_карты";

/// One row of the street index table, in [`INDEX_HEADERS`] order.
#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub struct IndexRow {
    /// Merged index label.
    pub index: String,
    /// Sheet label.
    pub sheet: String,
    /// Formatted street name.
    pub street: String,
    /// Uniqueness label.
    pub uniqueness: String,
}

impl From<&OutputRecord> for IndexRow {
    fn from(record: &OutputRecord) -> Self {
        let uniqueness = record.uniqueness.to_string();
        match &record.content {
            RecordContent::Indexed {
                final_index,
                sheet,
                street,
            } => Self {
                index: final_index.clone(),
                sheet: sheet.to_string(),
                street: street.clone(),
                uniqueness,
            },
            RecordContent::Failed(_) => Self {
                index: ERROR_MARKER.to_owned(),
                sheet: ERROR_MARKER.to_owned(),
                street: ERROR_MARKER.to_owned(),
                uniqueness,
            },
        }
    }
}

/// Reads a delimited table whose first record is the header row.
///
/// Records may be shorter or longer than the header.
///
/// # Errors
///
/// Returns [`csv::Error`] if the input is not valid delimited text.
pub fn read_table<R: io::Read>(reader: R, delimiter: u8) -> Result<RecordTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let mut table = RecordTable::new(reader.headers()?.iter());
    for record in reader.records() {
        table.push_row(record?.iter());
    }
    log::debug!(
        "read {} rows with columns {:?}",
        table.len(),
        table.headers()
    );
    Ok(table)
}

/// Writes the street index with its header row.
///
/// Failed records render [`ERROR_MARKER`] in their first three columns,
/// which is also the street they are sorted under.
///
/// # Errors
///
/// Returns [`csv::Error`] if writing fails.
pub fn write_index<W: io::Write>(
    writer: W,
    delimiter: u8,
    records: &[OutputRecord],
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(INDEX_HEADERS)?;
    for record in records {
        writer.serialize(IndexRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Copies every row of `table` and appends its index and sheet.
///
/// Rows whose coordinates cannot be indexed get [`ERROR_MARKER`] in both
/// appended columns.
///
/// # Errors
///
/// Returns [`AppError::Engine`] if the coordinate columns are missing and
/// [`AppError::Csv`] if writing fails.
pub fn write_annotated<W: io::Write>(
    writer: W,
    delimiter: u8,
    table: &RecordTable,
    columns: &ColumnSpec,
    indexer: &GridIndexer,
    border: f64,
) -> Result<(), AppError> {
    let rows = table.select(&columns.clone().without_street())?;
    let width = table.headers().len();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    let mut header: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    header.extend([ANNOTATED_INDEX_HEADER, ANNOTATED_SHEET_HEADER]);
    writer.write_record(&header)?;

    let mut failed = 0;
    for (cells, row) in table.rows().iter().zip(&rows) {
        let (index, sheet) = match row
            .point()
            .ok()
            .and_then(|point| indexer.locate(point, border).ok())
        {
            Some(location) => (location.index.to_string(), location.sheet.to_string()),
            None => {
                failed += 1;
                (ERROR_MARKER.to_owned(), ERROR_MARKER.to_owned())
            }
        };

        let mut record: Vec<String> = cells.iter().map(ToString::to_string).collect();
        record.resize(width.max(record.len()), String::new());
        record.extend([index, sheet]);
        writer.write_record(&record)?;
    }
    writer.flush()?;
    log::debug!("annotated {} rows, {failed} failed", rows.len());
    Ok(())
}
