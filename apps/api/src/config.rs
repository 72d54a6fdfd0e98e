use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://jobs.db?mode=rwc";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_FORTUNE_API_URL: &str =
    "https://fortune.com/api/v2/list/fortune-500/companies?limit=500";
const DEFAULT_FORTUNE_LIST_URL: &str = "https://fortune.com/fortune500/2024/";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub normalize_dates_on_startup: bool,
    pub fortune_api_url: String,
    pub fortune_list_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            normalize_dates_on_startup: parse_bool(&env_or("NORMALIZE_DATES_ON_STARTUP", "true"))
                .context("NORMALIZE_DATES_ON_STARTUP must be true or false")?,
            fortune_api_url: env_or("FORTUNE_API_URL", DEFAULT_FORTUNE_API_URL),
            fortune_list_url: env_or("FORTUNE_LIST_URL", DEFAULT_FORTUNE_LIST_URL),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized boolean '{other}'"),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router and handler tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            normalize_dates_on_startup: false,
            fortune_api_url: "http://127.0.0.1:9/companies".to_string(),
            fortune_list_url: "http://127.0.0.1:9/list".to_string(),
        }
    }
}
