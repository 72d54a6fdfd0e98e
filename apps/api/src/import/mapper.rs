//! Row-to-Record Mapper — turns header-normalized sheet rows into job candidates.

use std::collections::BTreeMap;

use crate::import::columns::{CanonicalField, ColumnMap};
use crate::import::reader::{RawSheet, SheetRow};
use crate::import::ImportError;
use crate::models::job::NewJob;

/// One spreadsheet line keyed by canonical field. Lives only for the mapping pass.
#[derive(Debug, Clone)]
pub struct ImportRow<'a> {
    pub line: usize,
    values: BTreeMap<CanonicalField, &'a str>,
}

impl<'a> ImportRow<'a> {
    pub fn from_sheet_row(row: &'a SheetRow, columns: &ColumnMap) -> Self {
        let values = columns
            .fields()
            .filter_map(|(field, idx)| row.cell(idx).map(|v| (field, v)))
            .collect();
        ImportRow {
            line: row.line,
            values,
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&'a str> {
        self.values.get(&field).copied()
    }

    /// Cell value, or empty string when the column or cell is absent.
    fn text(&self, field: CanonicalField) -> String {
        self.get(field).unwrap_or_default().to_string()
    }

    fn required(&self, field: CanonicalField) -> Result<String, ImportError> {
        let value = self.text(field);
        if value.trim().is_empty() {
            return Err(ImportError::EmptyRequiredField {
                row: self.line,
                field: field.as_str(),
            });
        }
        Ok(value)
    }

    /// Values are copied verbatim: no trimming, no coercion.
    pub fn into_new_job(self) -> Result<NewJob, ImportError> {
        Ok(NewJob {
            company: self.required(CanonicalField::Company)?,
            position: self.required(CanonicalField::Position)?,
            resume_used: Some(self.text(CanonicalField::ResumeUsed)),
            date_applied: Some(self.text(CanonicalField::DateApplied)),
            status: Some(self.text(CanonicalField::Status)),
            interview_details: Some(self.text(CanonicalField::InterviewDetails)),
            comments: Some(self.text(CanonicalField::Comments)),
            link: Some(self.text(CanonicalField::Link)),
            job_description: Some(self.text(CanonicalField::JobDescription)),
        })
    }
}

/// Maps every row of the sheet, failing on the first row with an empty
/// company or position. Duplicates are kept as-is.
pub fn map_rows(sheet: &RawSheet, columns: &ColumnMap) -> Result<Vec<NewJob>, ImportError> {
    sheet
        .rows
        .iter()
        .map(|row| ImportRow::from_sheet_row(row, columns).into_new_job())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::columns::map_columns;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        RawSheet {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, cells)| SheetRow {
                    line: i + 2,
                    cells: cells.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    const HEADERS: [&str; 8] = [
        "company",
        "position",
        "resume used",
        "date applied",
        "status",
        "interview details",
        "comments",
        "link",
    ];

    #[test]
    fn test_maps_row_verbatim() {
        let s = sheet(
            &HEADERS,
            &[&[
                "Acme ",
                "Engineer",
                "v3.pdf",
                "45292",
                "Applied",
                "",
                "  referral",
                "https://acme.test/jobs/1",
            ]],
        );
        let columns = map_columns(&s.headers).unwrap();
        let jobs = map_rows(&s, &columns).unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.company, "Acme ");
        assert_eq!(job.date_applied.as_deref(), Some("45292"));
        assert_eq!(job.comments.as_deref(), Some("  referral"));
        assert_eq!(job.job_description.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_cells_become_empty_strings() {
        let s = sheet(&HEADERS, &[&["Acme", "Engineer"]]);
        let columns = map_columns(&s.headers).unwrap();
        let job = map_rows(&s, &columns).unwrap().remove(0);
        assert_eq!(job.resume_used.as_deref(), Some(""));
        assert_eq!(job.link.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_position_rejects_whole_sheet() {
        let s = sheet(
            &HEADERS,
            &[
                &["Acme", "Engineer"],
                &["Globex", "   "],
                &["Initech", "Analyst"],
            ],
        );
        let columns = map_columns(&s.headers).unwrap();
        match map_rows(&s, &columns) {
            Err(ImportError::EmptyRequiredField { row, field }) => {
                assert_eq!(row, 3);
                assert_eq!(field, "position");
            }
            other => panic!("expected EmptyRequiredField, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicates_are_not_merged() {
        let s = sheet(&HEADERS, &[&["Acme", "Engineer"], &["Acme", "Engineer"]]);
        let columns = map_columns(&s.headers).unwrap();
        assert_eq!(map_rows(&s, &columns).unwrap().len(), 2);
    }
}
