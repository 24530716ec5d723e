//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GENIUS_MINDS` prefix and nested values use double underscores as separators.
//! Every setting has a default, so an empty environment yields a working
//! (fully simulated) configuration.
//!
//! # Example
//!
//! ```no_run
//! use genius_minds::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! println!("Conversations stored at {}", config.storage.path.display());
//! ```

mod dispatch;
mod error;
mod export;
mod logging;
mod persona;
mod storage;
mod summarizer;

pub use dispatch::DispatchSettings;
pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use persona::PersonaServiceConfig;
pub use storage::StorageConfig;
pub use summarizer::SummarizerConfig;

use secrecy::Secret;
use serde::Deserialize;

/// Conventional variable for the persona service key
const SENSAY_API_KEY_VAR: &str = "SENSAY_API_KEY";

/// Conventional variable for the summarizer key
const CEREBRAS_API_KEY_VAR: &str = "CEREBRAS_API_KEY";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Conversation persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote persona service (Sensay)
    #[serde(default)]
    pub persona: PersonaServiceConfig,

    /// Summarization service (Cerebras)
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Group reply timing and timeouts
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// PDF export
    #[serde(default)]
    pub export: ExportConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GENIUS_MINDS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `SENSAY_API_KEY` / `CEREBRAS_API_KEY` for unset keys
    /// 5. Validates the result
    ///
    /// # Environment Variable Format
    ///
    /// - `GENIUS_MINDS__STORAGE__PATH=/tmp/chats.json` -> `storage.path`
    /// - `GENIUS_MINDS__DISPATCH__MAX_DELAY_MS=1000` -> `dispatch.max_delay_ms`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed or fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GENIUS_MINDS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if config.persona.api_key.is_none() {
            config.persona.api_key = conventional_key(SENSAY_API_KEY_VAR);
        }
        if config.summarizer.api_key.is_none() {
            config.summarizer.api_key = conventional_key(CEREBRAS_API_KEY_VAR);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.persona.validate()?;
        self.summarizer.validate()?;
        self.dispatch.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

fn conventional_key(var: &str) -> Option<Secret<String>> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Secret::new)
}
