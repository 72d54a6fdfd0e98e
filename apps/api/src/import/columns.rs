//! Column Normalizer — resolves spreadsheet headers to canonical job fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::import::ImportError;

/// Internal name of a recognized job column, independent of the source header spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Company,
    Position,
    ResumeUsed,
    DateApplied,
    Status,
    InterviewDetails,
    Comments,
    Link,
    JobDescription,
}

/// Every import must carry these columns.
pub const REQUIRED_FIELDS: [CanonicalField; 8] = [
    CanonicalField::Company,
    CanonicalField::Position,
    CanonicalField::ResumeUsed,
    CanonicalField::DateApplied,
    CanonicalField::Status,
    CanonicalField::InterviewDetails,
    CanonicalField::Comments,
    CanonicalField::Link,
];

impl CanonicalField {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Company => "company",
            CanonicalField::Position => "position",
            CanonicalField::ResumeUsed => "resume_used",
            CanonicalField::DateApplied => "date_applied",
            CanonicalField::Status => "status",
            CanonicalField::InterviewDetails => "interview_details",
            CanonicalField::Comments => "comments",
            CanonicalField::Link => "link",
            CanonicalField::JobDescription => "job_description",
        }
    }

    /// Resolves an already-normalized header (see [`normalize_header`]).
    /// Known misspellings from hand-maintained trackers are accepted.
    pub fn from_header(normalized: &str) -> Option<Self> {
        let field = match normalized {
            "company" | "compay applied" | "company applied" | "company name" => {
                CanonicalField::Company
            }
            "position" | "position applied" | "job title" => CanonicalField::Position,
            "resume used" | "resume" => CanonicalField::ResumeUsed,
            "date applied" | "applied date" | "application date" => CanonicalField::DateApplied,
            "status" | "application status" => CanonicalField::Status,
            "interview details" | "interviews" => CanonicalField::InterviewDetails,
            "comments" | "comment" | "notes" => CanonicalField::Comments,
            "link" | "url" | "job link" => CanonicalField::Link,
            "job description" | "description" => CanonicalField::JobDescription,
            _ => return None,
        };
        Some(field)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trims, lower-cases and collapses underscores and inner whitespace to single spaces.
pub fn normalize_header(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical field → column index for one uploaded sheet.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: BTreeMap<CanonicalField, usize>,
    ignored: Vec<String>,
}

impl ColumnMap {
    /// Builds the map without checking required fields. The first header that
    /// resolves to a field wins; later duplicates are ignored.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, raw) in headers.iter().enumerate() {
            match CanonicalField::from_header(&normalize_header(raw)) {
                Some(field) if !map.indices.contains_key(&field) => {
                    map.indices.insert(field, idx);
                }
                _ => map.ignored.push(raw.trim().to_string()),
            }
        }
        map
    }

    #[cfg(test)]
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (CanonicalField, usize)> + '_ {
        self.indices.iter().map(|(f, i)| (*f, *i))
    }

    /// Required fields with no matching column, in canonical order.
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| !self.indices.contains_key(f))
            .collect()
    }

    /// Original header text of columns that will be dropped.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

/// Resolves headers and fails if any required column is absent.
/// All-or-nothing: nothing is imported when this returns an error.
pub fn map_columns(headers: &[String]) -> Result<ColumnMap, ImportError> {
    let map = ColumnMap::from_headers(headers);
    let missing = map.missing_required();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns { missing });
    }
    Ok(map)
}

/// Dry-run comparison of an uploaded header row against the recognized columns.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnAlignment {
    pub aligned: bool,
    pub missing: Vec<CanonicalField>,
    pub extra: Vec<String>,
}

pub fn compare_columns(headers: &[String]) -> ColumnAlignment {
    let map = ColumnMap::from_headers(headers);
    let missing = map.missing_required();
    let extra = map
        .ignored()
        .iter()
        .filter(|h| !h.is_empty())
        .cloned()
        .collect::<Vec<_>>();
    ColumnAlignment {
        aligned: missing.is_empty() && extra.is_empty(),
        missing,
        extra,
    }
}
