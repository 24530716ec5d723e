//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Conversation persistence
//! - `PersonaResponder` - Persona chat replies
//! - `SummarizationResponder` - Categorized transcript analysis
//! - `PdfRenderer` - HTML to PDF rasterization

mod conversation_store;
mod pdf_renderer;
mod persona_responder;
mod summarization_responder;

pub use conversation_store::{ConversationMutation, ConversationStore, StoreError, STORAGE_KEY};
pub use pdf_renderer::{PdfRenderer, RenderError};
pub use persona_responder::{
    ChatRequest, HistoryTurn, PersonaReply, PersonaResponder, ResponderError, TurnRole,
};
pub use summarization_responder::{SummarizationError, SummarizationResponder, SummaryRequest};
