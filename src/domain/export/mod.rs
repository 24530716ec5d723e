//! Export domain module.
//!
//! Everything needed to turn a conversation into refined notes except the
//! remote summarization call and PDF rasterization: transcript flattening,
//! analysis categories and prompt, markdown stripping, document layouts and
//! download names.

mod categories;
mod document;
mod format;
mod markdown;
mod transcript;

pub use categories::{
    category_template, guidance_for, resolve_categories, summarization_prompt,
    DEFAULT_CATEGORIES, DEFAULT_GUIDANCE,
};
pub use document::{notes_filename, Attribution, ExportedDocument, NotesDocument};
pub use format::ExportFormat;
pub use markdown::strip_markdown;
pub use transcript::Transcript;
