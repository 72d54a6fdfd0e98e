use std::sync::Arc;

use sqlx::SqlitePool;

use crate::careers::sources::CareerSource;
use crate::config::Config;
use crate::llm_client::Completion;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Default: `LlmClient`. Tests swap in scripted completions.
    pub llm: Arc<dyn Completion>,
    /// Company list and careers pages for the career-match pipeline.
    pub careers: Arc<dyn CareerSource>,
    pub config: Config,
}
