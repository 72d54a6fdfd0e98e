use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted job application. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub resume_used: Option<String>,
    pub date_applied: Option<String>,
    /// Usually one of Applied, Rejected, Interviewing. Not enforced.
    pub status: Option<String>,
    pub interview_details: Option<String>,
    pub comments: Option<String>,
    pub link: Option<String>,
    pub job_description: Option<String>,
}

/// Candidate record for insert or overwrite, from a manual form or a spreadsheet row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub resume_used: Option<String>,
    #[serde(default)]
    pub date_applied: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub interview_details: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[cfg(test)]
impl NewJob {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Default::default()
        }
    }
}
