//! Sensay Responder - Implementation of PersonaResponder for the Sensay API.
//!
//! Each persona is a trained replica on the Sensay service, addressed by the
//! replica UUID registered in the persona catalog.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SensayConfig::new()
//!     .with_api_key(api_key)
//!     .with_base_url("https://api.sensay.io");
//!
//! let responder = SensayPersonaResponder::new(config, catalog)?;
//! ```
//!
//! # Fallback
//!
//! Without an API key, or for personas with no replica UUID, replies come
//! from the [`SimulatedPersonaResponder`]. Remote failures are NOT masked by
//! the fallback; they are returned as errors for the caller to handle.
//!
//! The service keeps its own per-user chat history, so request history is
//! not forwarded.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::simulated_responder::SimulatedPersonaResponder;
use crate::domain::foundation::Timestamp;
use crate::domain::persona::PersonaCatalog;
use crate::ports::{ChatRequest, PersonaReply, PersonaResponder, ResponderError};

/// Appended to every user message so replicas stay in character.
const IN_CHARACTER_INSTRUCTION: &str = "IMPORTANT: Respond as your authentic historical self, not as an AI assistant. Use your personal experiences, discoveries, and unique way of thinking. Share analogies from your actual life and work. Speak as you would have when you were alive, with your characteristic personality, humor, and wisdom. Be concise but profound. Always respond in English only.";

/// Configuration for the Sensay responder.
#[derive(Debug, Clone)]
pub struct SensayConfig {
    /// Organization secret; `None` means simulate every reply.
    api_key: Option<Secret<String>>,
    /// Base URL for the API (default: https://api.sensay.io).
    pub base_url: String,
    /// Value of the `X-API-Version` header.
    pub api_version: String,
    /// Value of the `X-USER-ID` header.
    pub user_id: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SensayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SensayConfig {
    /// Creates a configuration with defaults and no API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.sensay.io".to_string(),
            api_version: "2025-03-25".to_string(),
            user_id: "genius-minds-user".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the organization secret. Blank keys are ignored.
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

    /// Sets the API version header value.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the user id header value.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Sensay API persona responder.
pub struct SensayPersonaResponder {
    config: SensayConfig,
    client: Client,
    catalog: Arc<PersonaCatalog>,
    simulated: SimulatedPersonaResponder,
}

impl SensayPersonaResponder {
    /// Creates a responder.
    ///
    /// # Errors
    ///
    /// Returns `ResponderError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: SensayConfig, catalog: Arc<PersonaCatalog>) -> Result<Self, ResponderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResponderError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            catalog,
            simulated: SimulatedPersonaResponder::new(),
        })
    }

    /// Replaces the fallback responder (e.g. with a seeded one).
    pub fn with_simulated(mut self, simulated: SimulatedPersonaResponder) -> Self {
        self.simulated = simulated;
        self
    }

    /// Builds the chat completions endpoint URL for a replica.
    fn completions_url(&self, replica_uuid: &str) -> String {
        format!(
            "{}/v1/replicas/{}/chat/completions",
            self.config.base_url, replica_uuid
        )
    }

    async fn call_replica(
        &self,
        api_key: &str,
        replica_uuid: &str,
        message: &str,
    ) -> Result<PersonaReply, ResponderError> {
        let body = SensayRequest {
            content: format!("{}\n\n{}", message, IN_CHARACTER_INSTRUCTION),
        };

        let response = self
            .client
            .post(self.completions_url(replica_uuid))
            .header("X-ORGANIZATION-SECRET", api_key)
            .header("X-API-Version", &self.config.api_version)
            .header("X-USER-ID", &self.config.user_id)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ResponderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ResponderError::network(format!("Connection failed: {}", e))
                } else {
                    ResponderError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResponderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SensayResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::parse(e.to_string()))?;

        match payload {
            SensayResponse {
                success: true,
                content: Some(content),
            } if !content.is_empty() => {
                let now = Timestamp::now();
                Ok(PersonaReply {
                    id: format!("sensay-{}", now.as_datetime().timestamp_millis()),
                    content,
                    timestamp: now,
                })
            }
            _ => Err(ResponderError::Rejected(
                "Invalid response from Sensay API".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PersonaResponder for SensayPersonaResponder {
    async fn chat(&self, request: ChatRequest) -> Result<PersonaReply, ResponderError> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            tracing::warn!(persona = %request.persona_id, "No Sensay API key configured, using simulated reply");
            return self.simulated.chat(request).await;
        };
        let Some(replica_uuid) = self.catalog.remote_id(&request.persona_id) else {
            tracing::warn!(persona = %request.persona_id, "No replica registered for persona, using simulated reply");
            return self.simulated.chat(request).await;
        };

        tracing::debug!(persona = %request.persona_id, replica = %replica_uuid, "Calling Sensay replica");
        self.call_replica(api_key.expose_secret(), replica_uuid, &request.message)
            .await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Sensay API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct SensayRequest {
    content: String,
}

#[derive(Debug, Deserialize)]
struct SensayResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::simulated_responder::canned_lines;
    use crate::domain::persona::PersonaId;

    fn responder(config: SensayConfig) -> SensayPersonaResponder {
        SensayPersonaResponder::new(config, Arc::new(PersonaCatalog::builtin()))
            .unwrap()
            .with_simulated(SimulatedPersonaResponder::with_seed(1))
    }

    #[test]
    fn config_defaults() {
        let config = SensayConfig::new();
        assert_eq!(config.base_url, "https://api.sensay.io");
        assert_eq!(config.api_version, "2025-03-25");
        assert_eq!(config.user_id, "genius-minds-user");
        assert!(!config.has_api_key());
    }

    #[test]
    fn blank_api_key_is_ignored() {
        assert!(!SensayConfig::new().with_api_key("  ").has_api_key());
        assert!(SensayConfig::new().with_api_key("secret").has_api_key());
    }

    #[test]
    fn completions_url_targets_replica() {
        let r = responder(SensayConfig::new().with_base_url("http://localhost:9999/"));
        assert_eq!(
            r.completions_url("abc-123"),
            "http://localhost:9999/v1/replicas/abc-123/chat/completions"
        );
    }

    #[tokio::test]
    async fn missing_api_key_falls_back_to_simulation() {
        let r = responder(SensayConfig::new());
        let reply = r
            .chat(ChatRequest::new(PersonaId::new("davinci").unwrap(), "Hi"))
            .await
            .unwrap();
        assert!(canned_lines("davinci").contains(&reply.content.as_str()));
    }

    #[tokio::test]
    async fn persona_without_replica_falls_back_to_simulation() {
        // Unroutable base URL: reaching the network would fail the test.
        let r = responder(
            SensayConfig::new()
                .with_api_key("secret")
                .with_base_url("http://127.0.0.1:9"),
        );
        let reply = r
            .chat(ChatRequest::new(PersonaId::new("hypatia").unwrap(), "Hi"))
            .await
            .unwrap();
        assert!(canned_lines("einstein").contains(&reply.content.as_str()));
    }

    #[tokio::test]
    async fn network_failure_is_an_error_not_a_fallback() {
        let r = responder(
            SensayConfig::new()
                .with_api_key("secret")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(2)),
        );
        let result = r
            .chat(ChatRequest::new(PersonaId::new("einstein").unwrap(), "Hi"))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn response_payload_parses() {
        let ok: SensayResponse =
            serde_json::from_str(r#"{"success": true, "content": "Hello"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.content.as_deref(), Some("Hello"));

        let failed: SensayResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!failed.success);
        assert!(failed.content.is_none());
    }
}
