//! Text-generation service client
//!
//! [`CompletionClient`] is the transport seam: one prompt in, generated text
//! out. [`OpenAiClient`] speaks the OpenAI-compatible chat completions API.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One request to the text-generation service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Transport-level failures
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("malformed service response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by text-generation backends.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for a single prompt. At most one service call per invocation.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CompletionError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        Self::new(&config.api_key, &config.base_url, config.request_timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// API request/response types

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.len(),
            "[OpenAiClient] Sending completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(e.to_string())
                } else {
                    CompletionError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("[OpenAiClient] API error ({}): {}", status, body);
            return Err(CompletionError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout(e.to_string())
            } else {
                CompletionError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("response has no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-test".into(),
            prompt: "Summarize".into(),
            max_tokens: 100,
            temperature: 0.2,
        }
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .json_body_partial(r#"{"model":"gpt-test","max_tokens":100}"#);
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "Generated"}}]
                }));
            })
            .await;

        let client = OpenAiClient::new("sk-test", server.base_url(), Duration::from_secs(5)).unwrap();
        let text = client.complete(request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Generated");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(500).body("boom");
            })
            .await;

        let client = OpenAiClient::new("k", server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Api { status: 500, ref body } if body == "boom"));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let client = OpenAiClient::new("k", server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .delay(Duration::from_millis(1500))
                    .json_body(json!({"choices": [{"message": {"content": "late"}}]}));
            })
            .await;

        let client = OpenAiClient::new("k", server.base_url(), Duration::from_millis(200)).unwrap();
        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Timeout(_)), "{err:?}");
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = OpenAiClient::new("k", "http://host/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://host/v1/chat/completions");
    }
}
