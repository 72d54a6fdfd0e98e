//! Interview prep, coaching chat and skill extraction on top of the completion client.
//!
//! Each call is a single request to the model. A failed call never surfaces as an
//! error to the user: it is logged and replaced by fixed fallback text.

use serde::Serialize;
use tracing::warn;

use crate::assistant::prompts::{
    CHAT_FALLBACK, COACH_SYSTEM, INTERVIEW_PLAN_FALLBACK, INTERVIEW_PLAN_PROMPT,
    INTERVIEW_PLAN_SYSTEM, SKILLS_TASK,
};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{complete_json, ChatTurn, Completion, LlmError, Role};
use crate::models::job::JobRow;

/// Keeps the prompt bounded when users paste very long threads.
const MAX_HISTORY_TURNS: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub text: String,
    /// True when the model call failed and `text` is the canned fallback.
    pub fallback: bool,
}

impl AssistantReply {
    fn from_result(result: Result<String, LlmError>, fallback: &str, what: &str) -> Self {
        match result {
            Ok(text) => AssistantReply {
                text: text.trim().to_string(),
                fallback: false,
            },
            Err(e) => {
                warn!("{what} failed, using fallback text: {e}");
                AssistantReply {
                    text: fallback.to_string(),
                    fallback: true,
                }
            }
        }
    }
}

fn or_placeholder(value: &Option<String>) -> &str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "(not provided)",
    }
}

pub fn build_interview_prompt(job: &JobRow) -> String {
    INTERVIEW_PLAN_PROMPT
        .replace("{company}", &job.company)
        .replace("{position}", &job.position)
        .replace("{job_description}", or_placeholder(&job.job_description))
        .replace("{interview_details}", or_placeholder(&job.interview_details))
}

pub async fn interview_plan(llm: &dyn Completion, job: &JobRow) -> AssistantReply {
    let prompt = build_interview_prompt(job);
    let result = llm
        .complete(INTERVIEW_PLAN_SYSTEM, &[ChatTurn::user(prompt)])
        .await;
    AssistantReply::from_result(result, INTERVIEW_PLAN_FALLBACK, "Interview plan generation")
}

/// Sends the most recent history plus the new message to the coach.
pub async fn coaching_reply(
    llm: &dyn Completion,
    history: &[ChatTurn],
    message: &str,
) -> AssistantReply {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    // The conversation sent to the model must open with a user turn.
    let mut turns: Vec<ChatTurn> = history[start..]
        .iter()
        .skip_while(|t| t.role == Role::Assistant)
        .cloned()
        .collect();
    turns.push(ChatTurn::user(message));

    let result = llm.complete(COACH_SYSTEM, &turns).await;
    AssistantReply::from_result(result, CHAT_FALLBACK, "Coaching chat")
}

/// Extracts a de-duplicated (case-insensitive, first spelling kept) skill list.
pub async fn extract_skills(llm: &dyn Completion, text: &str) -> Result<Vec<String>, LlmError> {
    let raw: Vec<String> = complete_json(llm, &json_system(SKILLS_TASK), text).await?;
    Ok(dedup_skills(raw))
}

fn dedup_skills(raw: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}
