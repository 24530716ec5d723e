//! Mock responders for testing.
//!
//! Configurable implementations of the PersonaResponder and
//! SummarizationResponder ports, so tests run without calling real APIs.
//!
//! # Features
//!
//! - Pre-configured replies per persona (consumed in order)
//! - Simulated per-persona delays for ordering and timeout tests
//! - Error injection for fallback and skip behavior
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let responder = MockPersonaResponder::new()
//!     .with_reply(einstein.clone(), "Imagination is everything.")
//!     .with_error(curie.clone(), MockError::Network { message: "down".into() })
//!     .with_delay(einstein, Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::export::Attribution;
use crate::domain::persona::PersonaId;
use crate::ports::{
    ChatRequest, PersonaReply, PersonaResponder, ResponderError, SummarizationError,
    SummarizationResponder, SummaryRequest,
};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate a non-success HTTP status.
    Http { status: u16 },
    /// Simulate a network error.
    Network { message: String },
    /// Simulate an unparseable payload.
    Parse { message: String },
    /// Simulate a timeout.
    Timeout { timeout_secs: u64 },
    /// Simulate a missing credential (summarizer only; persona responders
    /// report it as unavailable).
    MissingCredential,
}

impl From<MockError> for ResponderError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Http { status } => ResponderError::Http {
                status,
                body: "mock failure".to_string(),
            },
            MockError::Network { message } => ResponderError::network(message),
            MockError::Parse { message } => ResponderError::parse(message),
            MockError::Timeout { timeout_secs } => ResponderError::Timeout { timeout_secs },
            MockError::MissingCredential => {
                ResponderError::Unavailable("missing credential".to_string())
            }
        }
    }
}

impl From<MockError> for SummarizationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Http { status } => SummarizationError::Http {
                status,
                body: "mock failure".to_string(),
            },
            MockError::Network { message } => SummarizationError::Network(message),
            MockError::Parse { message } => SummarizationError::Parse(message),
            MockError::Timeout { timeout_secs } => SummarizationError::Timeout { timeout_secs },
            MockError::MissingCredential => SummarizationError::MissingCredential,
        }
    }
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this content.
    Success(String),
    /// Return an error.
    Error(MockError),
}

// ════════════════════════════════════════════════════════════════════════════════
// Persona responder
// ════════════════════════════════════════════════════════════════════════════════

/// Mock persona responder.
///
/// Personas without queued responses reply `"<key> says: <message>"`.
#[derive(Debug, Clone, Default)]
pub struct MockPersonaResponder {
    responses: Arc<Mutex<HashMap<PersonaId, VecDeque<MockResponse>>>>,
    delays: Arc<Mutex<HashMap<PersonaId, Duration>>>,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockPersonaResponder {
    /// Creates a new mock responder with default replies and no delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply for a persona.
    pub fn with_reply(self, persona: PersonaId, content: impl Into<String>) -> Self {
        self.push(persona, MockResponse::Success(content.into()));
        self
    }

    /// Queues an error for a persona.
    pub fn with_error(self, persona: PersonaId, error: MockError) -> Self {
        self.push(persona, MockResponse::Error(error));
        self
    }

    /// Sets simulated latency for a persona's calls.
    pub fn with_delay(self, persona: PersonaId, delay: Duration) -> Self {
        locked(&self.delays).insert(persona, delay);
        self
    }

    /// Returns the number of calls made to this responder.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ChatRequest> {
        locked(&self.calls).clone()
    }

    /// Returns the recorded calls addressed to one persona.
    pub fn calls_for(&self, persona: &PersonaId) -> Vec<ChatRequest> {
        locked(&self.calls)
            .iter()
            .filter(|c| &c.persona_id == persona)
            .cloned()
            .collect()
    }

    fn push(&self, persona: PersonaId, response: MockResponse) {
        locked(&self.responses)
            .entry(persona)
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, request: &ChatRequest) -> MockResponse {
        locked(&self.responses)
            .get_mut(&request.persona_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                MockResponse::Success(format!("{} says: {}", request.persona_id, request.message))
            })
    }

    fn delay_for(&self, persona: &PersonaId) -> Duration {
        locked(&self.delays)
            .get(persona)
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

#[async_trait]
impl PersonaResponder for MockPersonaResponder {
    async fn chat(&self, request: ChatRequest) -> Result<PersonaReply, ResponderError> {
        locked(&self.calls).push(request.clone());

        let delay = self.delay_for(&request.persona_id);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        match self.next_response(&request) {
            MockResponse::Success(content) => Ok(PersonaReply::new(
                format!("mock-{}", request.persona_id),
                content,
            )),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Summarizer
// ════════════════════════════════════════════════════════════════════════════════

/// Mock summarizer.
#[derive(Debug, Clone)]
pub struct MockSummarizer {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    attribution: Attribution,
    calls: Arc<Mutex<Vec<SummaryRequest>>>,
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSummarizer {
    /// Creates a new mock summarizer.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            attribution: Attribution::new("Mock", "mock-model-1"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful analysis to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        locked(&self.responses).push_back(MockResponse::Success(content.into()));
        self
    }

    /// Adds an error to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        locked(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets the attribution to report.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    /// Returns the number of calls made to this summarizer.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<SummaryRequest> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl SummarizationResponder for MockSummarizer {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, SummarizationError> {
        locked(&self.calls).push(request);

        let next = locked(&self.responses).pop_front();
        match next {
            Some(MockResponse::Success(content)) => Ok(content),
            Some(MockResponse::Error(err)) => Err(err.into()),
            None => Ok("1. Core Insights (Bullet Points)\n- Mock analysis".to_string()),
        }
    }

    fn attribution(&self) -> Attribution {
        self.attribution.clone()
    }
}
