//! Persona service configuration (Sensay)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote persona service configuration
///
/// Without an API key every persona answers from the simulated responder.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaServiceConfig {
    /// Organization secret for the persona service
    pub api_key: Option<Secret<String>>,

    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `X-API-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Value sent in the `X-USER-ID` header
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl PersonaServiceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a non-blank API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate persona service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("persona.base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("persona.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for PersonaServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            user_id: default_user_id(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sensay.io".to_string()
}

fn default_api_version() -> String {
    "2025-03-25".to_string()
}

fn default_user_id() -> String {
    "genius-minds-user".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_defaults() {
        let config = PersonaServiceConfig::default();
        assert_eq!(config.base_url, "https://api.sensay.io");
        assert_eq!(config.api_version, "2025-03-25");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let config = PersonaServiceConfig {
            api_key: Some(Secret::new("  ".to_string())),
            ..Default::default()
        };
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_invalid_base_url() {
        let config = PersonaServiceConfig {
            base_url: "api.sensay.io".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidUrl("persona.base_url"))
        );
    }
}
