//! Career match: find postings at large employers whose required skills are all
//! covered by a resume.
//!
//! Flow: fetch companies → extract resume skills → per company fetch careers page →
//! LLM-extract postings → keep postings whose skills ⊆ resume skills.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod sources;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub location: Option<String>,
    pub careers_url: String,
}

/// One posting as extracted from a careers page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}
