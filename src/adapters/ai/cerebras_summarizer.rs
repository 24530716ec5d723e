//! Cerebras Summarizer - Implementation of SummarizationResponder.
//!
//! Sends the summarization prompt to Cerebras' OpenAI-compatible chat
//! completions endpoint as a single user message and returns the first
//! choice's content.
//!
//! # Configuration
//!
//! ```ignore
//! let config = CerebrasConfig::new()
//!     .with_api_key(api_key)
//!     .with_model("llama3.1-8b");
//!
//! let summarizer = CerebrasSummarizer::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::export::{summarization_prompt, Attribution};
use crate::ports::{SummarizationError, SummarizationResponder, SummaryRequest};

/// Configuration for the Cerebras summarizer.
#[derive(Debug, Clone)]
pub struct CerebrasConfig {
    /// API key; without one every call fails with `MissingCredential`.
    api_key: Option<Secret<String>>,
    /// Base URL for the API (default: https://api.cerebras.ai/v1).
    pub base_url: String,
    /// Model to use.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CerebrasConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CerebrasConfig {
    /// Creates a configuration with defaults and no API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.cerebras.ai/v1".to_string(),
            model: "llama3.1-8b".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the API key. Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(Secret::new(api_key))
        };
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the completion token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Cerebras API summarizer.
pub struct CerebrasSummarizer {
    config: CerebrasConfig,
    client: Client,
}

impl CerebrasSummarizer {
    /// Creates a summarizer.
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError::Network` if the HTTP client cannot be built.
    pub fn new(config: CerebrasConfig) -> Result<Self, SummarizationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("GeniusMinds/1.0")
            .build()
            .map_err(|e| SummarizationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_chat_request(&self, prompt: String) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl SummarizationResponder for CerebrasSummarizer {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, SummarizationError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(SummarizationError::MissingCredential)?;

        let prompt = summarization_prompt(&request.transcript, &request.categories);
        tracing::debug!(model = %self.config.model, categories = request.categories.len(), "Requesting conversation analysis");

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .json(&self.to_chat_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    SummarizationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::Parse(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SummarizationError::Parse("No choices in response".to_string()))
    }

    fn attribution(&self) -> Attribution {
        Attribution::new("Cerebras", self.config.model.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Chat Completions API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CerebrasConfig::new();
        assert_eq!(config.base_url, "https://api.cerebras.ai/v1");
        assert_eq!(config.model, "llama3.1-8b");
        assert_eq!(config.max_tokens, 4000);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_network() {
        let summarizer = CerebrasSummarizer::new(CerebrasConfig::new()).unwrap();
        let result = summarizer
            .summarize(SummaryRequest::new("USER: Hi", vec!["Weather".to_string()]))
            .await;
        assert!(matches!(result, Err(SummarizationError::MissingCredential)));
    }

    #[test]
    fn request_body_has_single_user_message() {
        let summarizer = CerebrasSummarizer::new(CerebrasConfig::new()).unwrap();
        let body = serde_json::to_value(summarizer.to_chat_request("PROMPT".to_string())).unwrap();

        assert_eq!(body["model"], "llama3.1-8b");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "PROMPT");
    }

    #[test]
    fn completion_response_parses_first_choice() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"1. Core Insights"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content, "1. Core Insights");
    }

    #[test]
    fn attribution_names_provider_and_model() {
        let summarizer =
            CerebrasSummarizer::new(CerebrasConfig::new().with_model("llama-4-scout")).unwrap();
        assert_eq!(
            summarizer.attribution(),
            Attribution::new("Cerebras", "llama-4-scout")
        );
    }
}
