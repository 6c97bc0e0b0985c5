//! Summarizer Module
//!
//! Turns normalized text into a [`Summary`] and a title by calling the
//! text-generation service under a strict JSON response contract.
//!
//! `summarize` failures are fatal to ingestion. `generate_title` never fails:
//! any problem yields [`FALLBACK_TITLE`].

use super::client::{CompletionClient, CompletionError, CompletionRequest};
use super::prompts;
use super::utils::{clean_title, extract_json_object};
use crate::model::{single_line, Summary};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Title used whenever title generation fails
pub const FALLBACK_TITLE: &str = "Untitled Note";

/// Bullet lists longer than this are cut
pub const MAX_BULLET_POINTS: usize = 15;

/// Low temperature for predictable, parseable output
const SUMMARY_TEMPERATURE: f32 = 0.2;
const TITLE_TEMPERATURE: f32 = 0.3;
const IMPROVE_TEMPERATURE: f32 = 0.4;

/// Reasons a summarization call is rejected
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("text generation service failed: {0}")]
    Service(#[from] CompletionError),
    #[error("response contained no JSON object")]
    NoJsonObject,
    #[error("response JSON could not be parsed: {0}")]
    InvalidJson(String),
    #[error("response is missing required key `{0}`")]
    MissingField(&'static str),
    #[error("response key `{0}` must be a string")]
    InvalidField(&'static str),
    #[error("`bulletPoints` must be a non-empty list of strings")]
    InvalidBulletPoints,
    #[error("service returned an empty response")]
    EmptyResponse,
}

/// Capability injected into the pipeline; tests substitute deterministic stubs.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a prose summary and ordered bullet points
    async fn summarize(&self, text: &str) -> Result<Summary, SummarizeError>;

    /// Produce a short title. Infallible; falls back to [`FALLBACK_TITLE`].
    async fn generate_title(&self, text: &str) -> String;

    /// Rewrite text to be clearer and more concise
    async fn improve_text(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Summarizer backed by a [`CompletionClient`]
pub struct LlmSummarizer<C> {
    client: C,
    model: String,
}

impl<C: CompletionClient> LlmSummarizer<C> {
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn request(&self, prompt: String, max_tokens: u32, temperature: f32) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt,
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl<C: CompletionClient> Summarizer for LlmSummarizer<C> {
    async fn summarize(&self, text: &str) -> Result<Summary, SummarizeError> {
        let request = self.request(
            prompts::build_summary_prompt(text),
            prompts::SUMMARY_MAX_TOKENS,
            SUMMARY_TEMPERATURE,
        );

        let content = self.client.complete(request).await.map_err(|e| {
            tracing::error!("[Summarizer] Summary request failed: {}", e);
            SummarizeError::Service(e)
        })?;

        tracing::debug!("[Summarizer] Received {} chars", content.len());

        let summary = parse_summary_response(&content).map_err(|e| {
            tracing::warn!("[Summarizer] Rejected summary response: {}", e);
            e
        })?;

        tracing::info!(
            "[Summarizer] Summary ready: {} bullet points",
            summary.bullet_points.len()
        );

        Ok(summary)
    }

    async fn generate_title(&self, text: &str) -> String {
        let request = self.request(
            prompts::build_title_prompt(text),
            prompts::TITLE_MAX_TOKENS,
            TITLE_TEMPERATURE,
        );

        match self.client.complete(request).await {
            Ok(raw) => {
                let title = clean_title(&raw);
                if title.is_empty() {
                    tracing::warn!("[Summarizer] Empty title response - using fallback");
                    FALLBACK_TITLE.to_string()
                } else {
                    title
                }
            }
            Err(e) => {
                tracing::warn!("[Summarizer] Title generation failed: {} - using fallback", e);
                FALLBACK_TITLE.to_string()
            }
        }
    }

    async fn improve_text(&self, text: &str) -> Result<String, SummarizeError> {
        let request = self.request(
            prompts::build_improve_prompt(text),
            prompts::IMPROVE_MAX_TOKENS,
            IMPROVE_TEMPERATURE,
        );

        let improved = self.client.complete(request).await?;
        let improved = improved.trim();
        if improved.is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }

        Ok(improved.to_string())
    }
}

/// Validate a raw model response against the summary contract
pub fn parse_summary_response(content: &str) -> Result<Summary, SummarizeError> {
    let json = extract_json_object(content).ok_or(SummarizeError::NoJsonObject)?;

    let value: Value =
        serde_json::from_str(json).map_err(|e| SummarizeError::InvalidJson(e.to_string()))?;

    let summary = value
        .get("summary")
        .ok_or(SummarizeError::MissingField("summary"))?
        .as_str()
        .ok_or(SummarizeError::InvalidField("summary"))?
        .trim()
        .to_string();

    let raw_points = value
        .get("bulletPoints")
        .ok_or(SummarizeError::MissingField("bulletPoints"))?
        .as_array()
        .ok_or(SummarizeError::InvalidBulletPoints)?;

    let mut bullet_points = Vec::with_capacity(raw_points.len());
    for point in raw_points {
        // One bullet per line in every rendering
        let point = single_line(point.as_str().ok_or(SummarizeError::InvalidBulletPoints)?);
        if !point.is_empty() {
            bullet_points.push(point);
        }
    }

    if bullet_points.is_empty() {
        return Err(SummarizeError::InvalidBulletPoints);
    }

    if bullet_points.len() > MAX_BULLET_POINTS {
        tracing::warn!(
            "[Summarizer] {} bullet points returned, keeping the first {}",
            bullet_points.len(),
            MAX_BULLET_POINTS
        );
        bullet_points.truncate(MAX_BULLET_POINTS);
    }

    Ok(Summary {
        summary,
        bullet_points,
    })
}
