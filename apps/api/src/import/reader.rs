//! Spreadsheet Reader — decodes `.csv` / `.xlsx` uploads into rows of string cells.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use crate::import::dates::serial_days_to_iso;
use crate::import::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Xlsx,
}

impl SpreadsheetFormat {
    /// Picks the decoder from the file extension (case-insensitive).
    /// Anything other than `.csv` / `.xlsx` is rejected before parsing.
    pub fn from_filename(filename: &str) -> Result<Self, ImportError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(SpreadsheetFormat::Csv),
            Some("xlsx") => Ok(SpreadsheetFormat::Xlsx),
            _ => Err(ImportError::UnsupportedFileType {
                filename: filename.to_string(),
            }),
        }
    }
}

/// One data line of the sheet. `line` is 1-based, the header being line 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl SheetRow {
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// Decodes the upload. Entirely blank lines are dropped.
pub fn read_sheet(format: SpreadsheetFormat, data: &[u8]) -> Result<RawSheet, ImportError> {
    let mut sheet = match format {
        SpreadsheetFormat::Csv => read_csv(data)?,
        SpreadsheetFormat::Xlsx => read_xlsx(data)?,
    };
    if sheet.headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::Malformed("file has no header row".to_string()));
    }
    sheet.rows.retain(|r| !r.is_blank());
    Ok(sheet)
}

fn read_csv(data: &[u8]) -> Result<RawSheet, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Malformed(format!("unreadable header row: {e}")))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ImportError::Malformed(e.to_string()))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        if record.len() > headers.len() {
            return Err(ImportError::Malformed(format!(
                "line {line} has {} cells but the header has {}",
                record.len(),
                headers.len()
            )));
        }
        rows.push(SheetRow {
            line,
            cells: record.iter().map(String::from).collect(),
        });
    }

    Ok(RawSheet { headers, rows })
}

fn read_xlsx(data: &[u8]) -> Result<RawSheet, ImportError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))
        .map_err(|e| ImportError::Malformed(format!("not a readable .xlsx workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Malformed("workbook has no worksheets".to_string()))?
        .map_err(|e| ImportError::Malformed(format!("unreadable first worksheet: {e}")))?;

    // The used range starts at the first non-empty row, which is not always sheet row 1.
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
    let mut lines = range.rows();
    let headers = lines
        .next()
        .map(|r| r.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    let rows = lines
        .enumerate()
        .map(|(idx, r)| SheetRow {
            line: first_row + idx + 2,
            cells: r.iter().map(cell_to_string).collect(),
        })
        .collect();

    Ok(RawSheet { headers, rows })
}

/// Renders one workbook cell the way it would read in a CSV export.
/// Whole-number floats lose their `.0`; formatted date cells become ISO dates.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if serial >= 0.0 {
                serial_days_to_iso(serial.trunc() as u64).unwrap_or_else(|| serial.to_string())
            } else {
                serial.to_string()
            }
        }
        other => other.to_string(),
    }
}
