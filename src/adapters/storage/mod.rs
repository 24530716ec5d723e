//! Storage Adapters
//!
//! Implementations of the ConversationStore port.
//!
//! ## Available Adapters
//!
//! - **FileConversationStore** - One JSON document on disk
//! - **InMemoryConversationStore** - In memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileConversationStore, InMemoryConversationStore};
//!
//! // Production: file-based storage
//! let store = FileConversationStore::in_dir("./data");
//!
//! // Testing: in-memory storage
//! let store = InMemoryConversationStore::new();
//! ```

mod file_store;
mod in_memory_store;

pub use file_store::FileConversationStore;
pub use in_memory_store::InMemoryConversationStore;
