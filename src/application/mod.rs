//! Application layer - services that orchestrate the domain over ports.
//!
//! - `ConversationEngine` - conversation lifecycle, message dispatch, membership
//! - `ExportPipeline` - transcript analysis and refined-notes export

mod conversation_engine;
mod export_pipeline;

pub use conversation_engine::{
    ConversationEngine, ConversationEvent, DispatchConfig, EngineError, APOLOGY_MESSAGE,
};
pub use export_pipeline::{ExportError, ExportPipeline};
