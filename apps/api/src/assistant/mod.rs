// LLM-backed interview prep: plan generation, coaching chat, skill extraction.
// All model calls go through llm_client::Completion.

pub mod handlers;
pub mod prompts;
pub mod service;
