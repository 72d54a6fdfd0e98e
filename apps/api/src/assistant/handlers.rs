//! Axum route handlers for the interview-prep assistant.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assistant::service::{coaching_reply, extract_skills, interview_plan};
use crate::errors::AppError;
use crate::jobs::repository::get_job;
use crate::llm_client::ChatTurn;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InterviewPlanResponse {
    pub job_id: i64,
    pub plan: String,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
}

/// POST /api/v1/jobs/:id/interview-plan
pub async fn handle_interview_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<InterviewPlanResponse>, AppError> {
    let job = get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let reply = interview_plan(state.llm.as_ref(), &job).await;
    Ok(Json(InterviewPlanResponse {
        job_id: id,
        plan: reply.text,
        fallback: reply.fallback,
    }))
}

/// POST /api/v1/assistant/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = coaching_reply(state.llm.as_ref(), &request.history, &request.message).await;
    Ok(Json(ChatResponse {
        reply: reply.text,
        fallback: reply.fallback,
    }))
}

/// POST /api/v1/assistant/skills
///
/// Returns an empty list when extraction fails.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<SkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let skills = extract_skills(state.llm.as_ref(), &request.text)
        .await
        .unwrap_or_else(|e| {
            warn!("Skill extraction failed: {e}");
            Vec::new()
        });
    Ok(Json(SkillsResponse { skills }))
}
