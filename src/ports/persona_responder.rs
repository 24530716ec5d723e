//! Persona Responder Port - Interface for persona chat backends.
//!
//! A responder answers one user message in the voice of one persona. The
//! engine treats every failure the same way (fallback or skip), so the error
//! taxonomy exists for logging and for responders' own retry decisions.
//! Calls are single attempts; nothing here retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::persona::PersonaId;

/// Port for generating persona replies.
#[async_trait]
pub trait PersonaResponder: Send + Sync {
    /// Produces one reply from `request.persona_id`.
    async fn chat(&self, request: ChatRequest) -> Result<PersonaReply, ResponderError>;
}

/// A message addressed to one persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub persona_id: PersonaId,
    pub message: String,
    /// Prior turns between the user and this persona, oldest first.
    pub history: Vec<HistoryTurn>,
}

impl ChatRequest {
    pub fn new(persona_id: PersonaId, message: impl Into<String>) -> Self {
        Self {
            persona_id,
            message: message.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = history;
        self
    }
}

/// Speaker of a prior turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A prior turn passed as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub content: String,
}

impl HistoryTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// A persona's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaReply {
    /// Responder-assigned identifier.
    pub id: String,
    pub content: String,
    pub timestamp: Timestamp,
}

impl PersonaReply {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Persona responder errors.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    /// Remote returned a non-success status.
    #[error("responder returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Remote answered but reported failure in its payload.
    #[error("responder reported failure: {0}")]
    Rejected(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the response payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Responder could not be constructed or is misconfigured.
    #[error("responder unavailable: {0}")]
    Unavailable(String),
}

impl ResponderError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if a later attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResponderError::Network(_) | ResponderError::Timeout { .. } => true,
            ResponderError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
