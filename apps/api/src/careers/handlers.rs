use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::careers::pipeline::{find_jobs_for_resume, MatchReport};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_MAX_COMPANIES: usize = 10;

fn default_radius() -> u32 {
    50
}

fn default_max_companies() -> usize {
    DEFAULT_MAX_COMPANIES
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub zip_code: String,
    /// Accepted for the request contract; companies are not filtered by distance yet.
    #[serde(default = "default_radius")]
    pub radius_miles: u32,
    #[serde(default = "default_max_companies")]
    pub max_companies: usize,
}

/// POST /api/v1/careers/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    info!(
        "Career match requested for zip {} within {} miles",
        request.zip_code, request.radius_miles
    );
    let report = find_jobs_for_resume(
        state.careers.as_ref(),
        state.llm.as_ref(),
        &request.resume_text,
        request.max_companies,
    )
    .await;
    Ok(Json(report))
}
