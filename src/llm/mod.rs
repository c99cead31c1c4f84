//! LLM integration module.
//!
//! Provides an OpenAI-compatible client for judge API calls and the
//! prompt template used for evidence judging.

mod client;
mod prompts;

pub use client::{LlmClient, Message, Role};
pub use prompts::Prompts;
