//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Persona responders (Sensay, simulated) and summarizers (Cerebras)
//! - `document` - PDF rendering (Pandoc)
//! - `storage` - Conversation persistence (JSON file, in-memory)

pub mod ai;
pub mod document;
pub mod storage;

pub use ai::{
    CerebrasConfig, CerebrasSummarizer, SensayConfig, SensayPersonaResponder,
    SimulatedPersonaResponder,
};
pub use document::PandocPdfRenderer;
pub use storage::{FileConversationStore, InMemoryConversationStore};
