//! Conversation Store Port - Interface for persisting conversations.
//!
//! The store is the single source of truth for conversations. Every
//! mutating operation is atomic on its own: implementations read the
//! collection, apply the change in memory, and write it back without any
//! other mutation interleaving. There are no cross-conversation
//! transactions.

use async_trait::async_trait;

use crate::domain::conversation::{Conversation, ConversationDraft, Message};
use crate::domain::foundation::{ConversationId, DomainError};

/// Namespaced key under which the conversation collection is persisted.
pub const STORAGE_KEY: &str = "genius_minds_conversations";

/// A change applied to one conversation inside a store operation.
///
/// Returning an error aborts the operation; nothing is written.
pub type ConversationMutation =
    Box<dyn FnOnce(&mut Conversation) -> Result<(), DomainError> + Send>;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to serialize conversations: {0}")]
    SerializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    /// The mutation refused to apply; the stored conversation is unchanged.
    #[error("Mutation rejected: {0}")]
    Rejected(DomainError),
}

impl StoreError {
    /// Returns the domain error if the mutation itself was rejected.
    pub fn as_rejection(&self) -> Option<&DomainError> {
        match self {
            StoreError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Port for conversation persistence.
///
/// # Contract
///
/// - `get_all` orders conversations most-recently-created first and never
///   fails; unreadable data reads as an empty collection
/// - `create` assigns a fresh identifier and creation time
/// - Operations on a missing conversation return `None` and write nothing
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All conversations, newest first.
    async fn get_all(&self) -> Vec<Conversation>;

    /// A single conversation, if it exists.
    async fn get_by_id(&self, id: ConversationId) -> Option<Conversation>;

    /// Persists a new conversation at the head of the collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the collection cannot be written.
    async fn create(&self, draft: ConversationDraft) -> Result<Conversation, StoreError>;

    /// Deletes a conversation, returning whether it existed.
    async fn delete(&self, id: ConversationId) -> Result<bool, StoreError>;

    /// Applies `mutation` to a conversation and persists the result.
    ///
    /// # Errors
    ///
    /// - `StoreError::Rejected` if the mutation returned an error
    /// - `StoreError` if the collection cannot be written
    async fn modify(
        &self,
        id: ConversationId,
        mutation: ConversationMutation,
    ) -> Result<Option<Conversation>, StoreError>;

    /// Appends a message and updates `last_activity`.
    async fn add_message(
        &self,
        id: ConversationId,
        message: Message,
    ) -> Result<Option<Conversation>, StoreError> {
        self.modify(
            id,
            Box::new(move |conversation| {
                conversation.append(message);
                Ok(())
            }),
        )
        .await
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// - `StoreError::Rejected` if the title is blank
    async fn update_title(
        &self,
        id: ConversationId,
        title: String,
    ) -> Result<Option<Conversation>, StoreError> {
        self.modify(id, Box::new(move |conversation| conversation.rename(title)))
            .await
    }
}
