//! LLM Client Abstraction
//!
//! Generic interface for the text-generation backend. The real client
//! speaks the Anthropic messages API over blocking HTTP; a fake client with
//! scripted responses backs the tests. Everything above this layer deals in
//! plain strings - transport, auth and token limits stop here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::conversation::ConversationHistory;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            api_key: String::new(),
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

/// LLM errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Generic text-generation client.
pub trait LlmClient {
    /// Send `prompt` as the next user turn after `history` and return the
    /// model's text. The caller owns history bookkeeping.
    fn generate(&self, prompt: &str, history: &ConversationHistory) -> Result<String, LlmError>;
}

/// Real client for the Anthropic messages endpoint.
pub struct AnthropicClient {
    config: LlmConfig,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl LlmClient for AnthropicClient {
    fn generate(&self, prompt: &str, history: &ConversationHistory) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.config.endpoint);

        let mut messages: Vec<WireMessage> = history
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    crate::conversation::Role::User => "user",
                    crate::conversation::Role::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect();
        messages.push(WireMessage {
            role: "user",
            content: prompt,
        });

        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        });

        tracing::debug!(model = %self.config.model, turns = messages.len(), "calling model");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::Http(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| LlmError::Http(format!("Failed to parse response: {e}")))?;

        let text = response_json
            .get("content")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("text"))
            .and_then(|v| v.as_str())
            .ok_or(LlmError::EmptyResponse)?;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text.to_string())
    }
}

/// Fake client for tests: returns scripted responses in order, repeating
/// the last one when only a single response is scripted.
pub struct FakeLlmClient {
    responses: std::sync::Mutex<Vec<Result<String, LlmError>>>,
    call_count: std::sync::Mutex<usize>,
}

impl FakeLlmClient {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            call_count: std::sync::Mutex::new(0),
        }
    }

    /// Client that always returns the same text.
    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Client that always returns an error.
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl LlmClient for FakeLlmClient {
    fn generate(&self, _prompt: &str, _history: &ConversationHistory) -> Result<String, LlmError> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.endpoint, "https://api.anthropic.com");
        assert_eq!(config.max_tokens, 4096);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = AnthropicClient::new(LlmConfig::default());
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn test_fake_client_repeats_single_response() {
        let client = FakeLlmClient::always("hello");
        let history = ConversationHistory::new();

        assert_eq!(client.generate("p", &history).unwrap(), "hello");
        assert_eq!(client.generate("p", &history).unwrap(), "hello");
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn test_fake_client_plays_responses_in_order() {
        let client = FakeLlmClient::new(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
            Err(LlmError::Timeout(30)),
        ]);
        let history = ConversationHistory::new();

        assert_eq!(client.generate("", &history).unwrap(), "one");
        assert_eq!(client.generate("", &history).unwrap(), "two");
        assert!(client.generate("", &history).is_err());
        assert_eq!(client.call_count(), 3);
    }
}
