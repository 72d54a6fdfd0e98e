//! Where the career-match pipeline gets companies and careers pages from.
//!
//! Company list: Fortune JSON API → scraped Fortune listing page → a fixture
//! company. The fixture careers URL serves canned HTML so the whole pipeline
//! runs offline during development.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::careers::{Company, JobPosting};

const REQUEST_TIMEOUT_SECS: u64 = 5;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const FIXTURE_CAREERS_URL: &str = "https://example.com/careers";
pub const FIXTURE_DOMAIN: &str = "example.com";

pub const FIXTURE_CAREERS_HTML: &str = r#"
<div class="jobs-list">
    <div class="job-posting">
        <h3>Senior Software Engineer</h3>
        <p class="location">New York, NY</p>
        <p class="skills">Required skills: Python, JavaScript, AWS</p>
        <a href="https://example.com/jobs/1">Apply</a>
    </div>
    <div class="job-posting">
        <h3>Full Stack Developer</h3>
        <p class="location">Remote</p>
        <p class="skills">Required skills: React, SQL, Node.js</p>
        <a href="https://example.com/jobs/2">Apply</a>
    </div>
</div>
"#;

pub fn fixture_companies() -> Vec<Company> {
    vec![Company {
        name: "Test Corp".to_string(),
        location: Some("New York, NY".to_string()),
        careers_url: FIXTURE_CAREERS_URL.to_string(),
    }]
}

/// Postings contained in [`FIXTURE_CAREERS_HTML`].
pub fn fixture_postings() -> Vec<JobPosting> {
    let posting = |title: &str, location: &str, url: &str, skills: &[&str]| JobPosting {
        title: title.to_string(),
        location: Some(location.to_string()),
        url: Some(url.to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        posting(
            "Senior Software Engineer",
            "New York, NY",
            "https://example.com/jobs/1",
            &["Python", "JavaScript", "AWS"],
        ),
        posting(
            "Full Stack Developer",
            "Remote",
            "https://example.com/jobs/2",
            &["React", "SQL", "Node.js"],
        ),
    ]
}

#[async_trait]
pub trait CareerSource: Send + Sync {
    /// Never fails: falls back down the chain to the fixture company.
    async fn fetch_companies(&self) -> Vec<Company>;

    async fn fetch_page(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct FortuneList {
    companies: Vec<FortuneCompany>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FortuneCompany {
    name: String,
    headquarters: Option<String>,
    careers_url: Option<String>,
}

/// Keeps only companies that publish a careers URL.
fn companies_from_fortune(list: FortuneList) -> Vec<Company> {
    list.companies
        .into_iter()
        .filter_map(|c| {
            let careers_url = c.careers_url.filter(|u| !u.trim().is_empty())?;
            Some(Company {
                name: c.name,
                location: c.headquarters,
                careers_url,
            })
        })
        .collect()
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{css}': {e}"))
}

/// Extracts `.company-card` entries from a listing page. Relative links are
/// resolved against `base`; cards without a name or link are skipped.
pub fn parse_company_cards(html: &str, base: &Url) -> Result<Vec<Company>> {
    let card_sel = selector(".company-card")?;
    let name_sel = selector(".company-name")?;
    let link_sel = selector("a")?;

    let document = Html::parse_document(html);
    let mut companies = Vec::new();
    for card in document.select(&card_sel) {
        let name = card
            .select(&name_sel)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .filter(|n| !n.is_empty());
        let href = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"));

        let (Some(name), Some(href)) = (name, href) else {
            debug!("Skipping company card without name or link");
            continue;
        };
        match base.join(href) {
            Ok(url) => companies.push(Company {
                name,
                location: None,
                careers_url: url.to_string(),
            }),
            Err(e) => debug!("Skipping company card with bad link '{href}': {e}"),
        }
    }
    Ok(companies)
}

/// Live HTTP implementation backed by reqwest.
pub struct HttpCareerSource {
    client: Client,
    api_url: String,
    list_url: String,
}

impl HttpCareerSource {
    pub fn new(api_url: String, list_url: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .user_agent(USER_AGENT)
                .build()?,
            api_url,
            list_url,
        })
    }

    async fn companies_from_api(&self) -> Result<Vec<Company>> {
        let list: FortuneList = self
            .client
            .get(&self.api_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(companies_from_fortune(list))
    }

    async fn companies_from_listing(&self) -> Result<Vec<Company>> {
        let base = Url::parse(&self.list_url)?;
        let html = self
            .client
            .get(base.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_company_cards(&html, &base)
    }
}

#[async_trait]
impl CareerSource for HttpCareerSource {
    async fn fetch_companies(&self) -> Vec<Company> {
        match self.companies_from_api().await {
            Ok(companies) if !companies.is_empty() => {
                info!("Company API returned {} companies", companies.len());
                return companies;
            }
            Ok(_) => warn!("Company API returned no companies, falling back to HTML scraping"),
            Err(e) => warn!("Company API error: {e}, falling back to HTML scraping"),
        }

        match self.companies_from_listing().await {
            Ok(companies) if !companies.is_empty() => {
                info!("Scraped {} companies from listing page", companies.len());
                companies
            }
            Ok(_) => {
                warn!("No companies found in listing page, using fixture company");
                fixture_companies()
            }
            Err(e) => {
                warn!("Listing scrape error: {e}, using fixture company");
                fixture_companies()
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        if url == FIXTURE_CAREERS_URL {
            return Ok(FIXTURE_CAREERS_HTML.to_string());
        }
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!("Fetched {} bytes from {url}", html.len());
        Ok(html)
    }
}
