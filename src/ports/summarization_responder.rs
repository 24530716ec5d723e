//! Summarization Responder Port - Interface for categorized analysis.
//!
//! Given a transcript and an ordered list of category labels, a summarizer
//! returns free text that is expected (not guaranteed) to be organized
//! under numbered headings in the same order.

use async_trait::async_trait;

use crate::domain::export::Attribution;

/// Port for generating categorized analyses of transcripts.
#[async_trait]
pub trait SummarizationResponder: Send + Sync {
    /// Produces the analysis text.
    ///
    /// An empty string is a successful result, distinct from every error.
    async fn summarize(&self, request: SummaryRequest) -> Result<String, SummarizationError>;

    /// Provider and model credited in the notes document.
    fn attribution(&self) -> Attribution;
}

/// Input to a summarization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub transcript: String,
    /// Category labels, already resolved against the defaults.
    pub categories: Vec<String>,
}

impl SummaryRequest {
    pub fn new(transcript: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            transcript: transcript.into(),
            categories,
        }
    }
}

/// Summarization errors.
#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    /// No API credential is configured.
    #[error("summarizer API key is not configured")]
    MissingCredential,

    /// Remote returned a non-success status.
    #[error("summarizer returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

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
}

impl SummarizationError {
    /// Returns true if a later attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SummarizationError::Network(_) | SummarizationError::Timeout { .. } => true,
            SummarizationError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
