//! Persona dispatch timing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Timing of group replies and responder timeouts
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchSettings {
    /// Shortest delay before a group participant is asked
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    /// Longest delay before a group participant is asked
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Bound on a single persona reply, in seconds
    #[serde(default = "default_responder_timeout")]
    pub responder_timeout_secs: u64,
}

impl DispatchSettings {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn responder_timeout(&self) -> Duration {
        Duration::from_secs(self.responder_timeout_secs)
    }

    /// Validate dispatch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ValidationError::InvalidDelayRange);
        }
        if self.responder_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout(
                "dispatch.responder_timeout_secs",
            ));
        }
        Ok(())
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            responder_timeout_secs: default_responder_timeout(),
        }
    }
}

fn default_min_delay() -> u64 {
    800
}

fn default_max_delay() -> u64 {
    2000
}

fn default_responder_timeout() -> u64 {
    30
}
