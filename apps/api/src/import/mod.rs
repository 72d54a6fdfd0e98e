//! Spreadsheet import: Reader → Column Normalizer → Mapper → Bulk Writer.
//!
//! One upload moves through `Received → Parsed → ColumnsValidated → RowsMapped →
//! Persisted`, or ends in `Rejected`. Nothing is retried; a failed import leaves
//! the store untouched and the caller resubmits a corrected file.

pub mod columns;
pub mod dates;
pub mod mapper;
pub mod reader;
pub mod writer;

use std::fmt;

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::import::columns::{compare_columns, map_columns, CanonicalField, ColumnAlignment};
use crate::import::mapper::map_rows;
use crate::import::reader::{read_sheet, SpreadsheetFormat};
use crate::import::writer::insert_batch;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No file part in the request")]
    NoFile,

    #[error("Unsupported file type '{filename}': only .csv and .xlsx are accepted")]
    UnsupportedFileType { filename: String },

    #[error("Missing required columns: {}", join_fields(.missing))]
    MissingColumns { missing: Vec<CanonicalField> },

    #[error("Row {row}: required field '{field}' is empty")]
    EmptyRequiredField { row: usize, field: &'static str },

    #[error("Malformed spreadsheet: {0}")]
    Malformed(String),

    #[error("Import failed: {0}")]
    ImportFailed(String),
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Received,
    Parsed,
    ColumnsValidated,
    RowsMapped,
    Persisted,
    Rejected,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportStage::Received => "received",
            ImportStage::Parsed => "parsed",
            ImportStage::ColumnsValidated => "columns_validated",
            ImportStage::RowsMapped => "rows_mapped",
            ImportStage::Persisted => "persisted",
            ImportStage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub filename: String,
    pub rows_imported: usize,
}

/// Tracks the stage of one upload so every transition and rejection is traced.
struct ImportRun<'a> {
    filename: &'a str,
    stage: ImportStage,
}

impl<'a> ImportRun<'a> {
    fn start(filename: &'a str) -> Self {
        debug!("Import of '{filename}': {}", ImportStage::Received);
        ImportRun {
            filename,
            stage: ImportStage::Received,
        }
    }

    fn advance(&mut self, next: ImportStage) {
        debug!("Import of '{}': {} -> {next}", self.filename, self.stage);
        self.stage = next;
    }

    fn reject(&mut self, err: ImportError) -> ImportError {
        warn!(
            "Import of '{}' rejected at stage {}: {err}",
            self.filename, self.stage
        );
        self.stage = ImportStage::Rejected;
        err
    }
}

/// Runs the whole import for one uploaded file. All rows are written or none are.
pub async fn import_spreadsheet(
    pool: &SqlitePool,
    filename: &str,
    data: &[u8],
) -> Result<ImportReport, ImportError> {
    let mut run = ImportRun::start(filename);

    let format = SpreadsheetFormat::from_filename(filename).map_err(|e| run.reject(e))?;
    let sheet = read_sheet(format, data).map_err(|e| run.reject(e))?;
    run.advance(ImportStage::Parsed);

    let columns = map_columns(&sheet.headers).map_err(|e| run.reject(e))?;
    if !columns.ignored().is_empty() {
        debug!("Import of '{filename}': dropping columns {:?}", columns.ignored());
    }
    run.advance(ImportStage::ColumnsValidated);

    let jobs = map_rows(&sheet, &columns).map_err(|e| run.reject(e))?;
    run.advance(ImportStage::RowsMapped);

    let rows_imported = insert_batch(pool, &jobs).await.map_err(|e| run.reject(e))?;
    run.advance(ImportStage::Persisted);

    info!("Imported {rows_imported} job(s) from '{filename}'");
    Ok(ImportReport {
        filename: filename.to_string(),
        rows_imported,
    })
}

/// Reads only the header row and reports how it lines up with the recognized columns.
pub fn check_columns(filename: &str, data: &[u8]) -> Result<ColumnAlignment, ImportError> {
    let format = SpreadsheetFormat::from_filename(filename)?;
    let sheet = read_sheet(format, data)?;
    Ok(compare_columns(&sheet.headers))
}
