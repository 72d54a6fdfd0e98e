use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::assistant::service::extract_skills;
use crate::careers::prompts::PARSE_JOBS_TASK;
use crate::careers::sources::{fixture_postings, CareerSource, FIXTURE_DOMAIN};
use crate::careers::JobPosting;
use crate::llm_client::prompts::json_system;
use crate::llm_client::{complete_json, Completion, LlmError};

/// Careers pages can be huge; only the head of the document is sent to the model.
const MAX_HTML_CHARS: usize = 60_000;

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub skills: Vec<String>,
    pub companies_checked: usize,
    /// Company name → postings the resume fully covers.
    pub matches: BTreeMap<String, Vec<JobPosting>>,
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Asks the model for the postings on a careers page. Canned fixture HTML
/// yields the fixture postings when the model output is unusable.
pub async fn parse_jobs(llm: &dyn Completion, html: &str) -> Result<Vec<JobPosting>, LlmError> {
    let page = truncate_chars(html, MAX_HTML_CHARS);
    match complete_json::<Vec<JobPosting>>(llm, &json_system(PARSE_JOBS_TASK), page).await {
        Ok(jobs) => Ok(jobs),
        Err(e) if html.contains(FIXTURE_DOMAIN) => {
            warn!("Job extraction failed on fixture page ({e}), using fixture postings");
            Ok(fixture_postings())
        }
        Err(e) => Err(e),
    }
}

fn skill_key(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Keeps postings whose every required skill appears in `skills` (case-insensitive).
pub fn filter_jobs(jobs: Vec<JobPosting>, skills: &[String]) -> Vec<JobPosting> {
    let have: HashSet<String> = skills.iter().map(|s| skill_key(s)).collect();
    jobs.into_iter()
        .filter(|job| job.skills.iter().all(|s| have.contains(&skill_key(s))))
        .collect()
}

/// Runs the whole match sequentially. A company whose page cannot be fetched or
/// parsed is logged and skipped.
pub async fn find_jobs_for_resume(
    source: &dyn CareerSource,
    llm: &dyn Completion,
    resume_text: &str,
    max_companies: usize,
) -> MatchReport {
    let companies = source.fetch_companies().await;
    let skills = extract_skills(llm, resume_text).await.unwrap_or_else(|e| {
        warn!("Resume skill extraction failed: {e}");
        Vec::new()
    });
    info!(
        "Matching {} resume skill(s) against up to {max_companies} of {} companies",
        skills.len(),
        companies.len()
    );

    let mut matches = BTreeMap::new();
    let mut companies_checked = 0;
    for company in companies.into_iter().take(max_companies) {
        companies_checked += 1;

        let html = match source.fetch_page(&company.careers_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Skipping {}: could not fetch {}: {e}", company.name, company.careers_url);
                continue;
            }
        };
        let jobs = match parse_jobs(llm, &html).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!("Skipping {}: job extraction failed: {e}", company.name);
                continue;
            }
        };

        let matched = filter_jobs(jobs, &skills);
        if !matched.is_empty() {
            matches.insert(company.name, matched);
        }
    }

    MatchReport {
        skills,
        companies_checked,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careers::sources::{fixture_companies, FIXTURE_CAREERS_HTML};
    use crate::careers::Company;
    use crate::llm_client::testing::ScriptedCompletion;
    use async_trait::async_trait;

    struct StaticSource {
        companies: Vec<Company>,
    }

    #[async_trait]
    impl CareerSource for StaticSource {
        async fn fetch_companies(&self) -> Vec<Company> {
            self.companies.clone()
        }

        async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
            if url.contains("example.com") {
                Ok(FIXTURE_CAREERS_HTML.to_string())
            } else {
                anyhow::bail!("connection refused")
            }
        }
    }

    fn posting(title: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            location: None,
            url: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_filter_jobs_requires_subset() {
        let jobs = vec![
            posting("Backend", &["Python", "AWS"]),
            posting("Frontend", &["React", "TypeScript"]),
            posting("Anything", &[]),
        ];
        let skills = vec!["python".to_string(), "AWS ".to_string(), "React".to_string()];
        let kept = filter_jobs(jobs, &skills);
        let titles: Vec<_> = kept.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Backend", "Anything"]);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_fixture_page_falls_back_to_fixture_postings() {
        let llm = ScriptedCompletion::replying(&["not json"]);
        let jobs = parse_jobs(&llm, FIXTURE_CAREERS_HTML).await.unwrap();
        assert_eq!(jobs, fixture_postings());
    }

    #[tokio::test]
    async fn test_real_page_parse_failure_is_an_error() {
        let llm = ScriptedCompletion::replying(&["not json"]);
        assert!(parse_jobs(&llm, "<html>acme careers</html>").await.is_err());
    }

    #[tokio::test]
    async fn test_find_jobs_end_to_end_with_fixture() {
        let source = StaticSource {
            companies: fixture_companies(),
        };
        // First reply: resume skills. Second: careers-page extraction (unusable → fixture).
        let llm = ScriptedCompletion::replying(&[
            r#"["Python", "JavaScript", "AWS", "Docker"]"#,
            "I could not parse that page.",
        ]);

        let report = find_jobs_for_resume(&source, &llm, "Python dev with AWS", 10).await;
        assert_eq!(report.companies_checked, 1);
        let matched = &report.matches["Test Corp"];
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Senior Software Engineer");
    }

    #[tokio::test]
    async fn test_unreachable_company_is_skipped() {
        let source = StaticSource {
            companies: vec![
                Company {
                    name: "Offline Inc".to_string(),
                    location: None,
                    careers_url: "https://offline.test/careers".to_string(),
                },
                fixture_companies().remove(0),
            ],
        };
        let llm = ScriptedCompletion::replying(&[
            r#"["React", "SQL", "Node.js"]"#,
            r#"[{"title": "Full Stack Developer", "location": "Remote", "url": null, "skills": ["React", "SQL", "Node.js"]}]"#,
        ]);

        let report = find_jobs_for_resume(&source, &llm, "full stack resume", 10).await;
        assert_eq!(report.companies_checked, 2);
        assert_eq!(report.matches.len(), 1);
        assert!(report.matches.contains_key("Test Corp"));
    }

    #[tokio::test]
    async fn test_company_limit_is_respected() {
        let source = StaticSource {
            companies: vec![fixture_companies().remove(0); 3],
        };
        let llm = ScriptedCompletion::replying(&[r#"["Python"]"#, "[]"]);
        let report = find_jobs_for_resume(&source, &llm, "resume", 1).await;
        assert_eq!(report.companies_checked, 1);
        assert!(report.matches.is_empty());
    }
}
