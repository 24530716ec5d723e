//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `persona` - Persona identities, profiles, and the built-in catalog
//! - `conversation` - Conversation aggregate, messages, and membership rules
//! - `export` - Transcript, analysis categories, and notes document rendering

pub mod conversation;
pub mod export;
pub mod foundation;
pub mod persona;
