//! Persona domain module.
//!
//! Persona identities, their display profiles, the snapshots frozen onto
//! messages, and the catalog of built-in historical figures.

mod catalog;
mod persona;

pub use catalog::PersonaCatalog;
pub use persona::{PersonaId, PersonaProfile, PersonaSnapshot};
