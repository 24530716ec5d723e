//! AI Responder Adapters.
//!
//! Implementations of the PersonaResponder and SummarizationResponder ports.
//!
//! ## Available Adapters
//!
//! - `SensayPersonaResponder` - Trained persona replicas on the Sensay API
//! - `SimulatedPersonaResponder` - Canned in-character lines, no network
//! - `CerebrasSummarizer` - Categorized analysis via Cerebras chat completions
//! - `MockPersonaResponder` / `MockSummarizer` - Configurable mocks for testing

mod cerebras_summarizer;
mod mock_provider;
mod sensay_responder;
mod simulated_responder;

pub use cerebras_summarizer::{CerebrasConfig, CerebrasSummarizer};
pub use mock_provider::{MockError, MockPersonaResponder, MockResponse, MockSummarizer};
pub use sensay_responder::{SensayConfig, SensayPersonaResponder};
pub use simulated_responder::{canned_lines, SimulatedPersonaResponder};
