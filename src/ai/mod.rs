//! AI summarization: transport client, prompts, response parsing.

pub mod client;
pub mod prompts;
pub mod summarizer;
mod utils;

pub use client::{CompletionClient, CompletionError, CompletionRequest, OpenAiClient};
pub use summarizer::{
    parse_summary_response, LlmSummarizer, SummarizeError, Summarizer, FALLBACK_TITLE,
    MAX_BULLET_POINTS,
};
pub use utils::{clean_title, extract_json_object};
