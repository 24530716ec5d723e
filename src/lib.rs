//! Genius Minds - Conversations with Historical Personas
//!
//! One-on-one chats and group discussions with AI personas of historical
//! figures, plus export of any conversation as AI-refined notes (markdown,
//! PDF, or a word-processor document).
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - conversations, messages, personas, and the export document model
//! - [`ports`] - traits for storage, persona replies, summarization, and PDF rendering
//! - [`adapters`] - JSON-file and in-memory stores, Sensay / simulated personas,
//!   the Cerebras summarizer, and the Pandoc renderer
//! - [`application`] - the conversation engine and the export pipeline
//! - [`config`] - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
