//! In-Memory Conversation Store Adapter
//!
//! Holds conversations in memory, newest first. Useful for testing and
//! for running without a data directory.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{Conversation, ConversationDraft};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationMutation, ConversationStore, StoreError};

/// In-memory storage for conversations
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<Vec<Conversation>>>,
}

impl InMemoryConversationStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored conversations (useful for tests)
    pub async fn clear(&self) {
        self.conversations.write().await.clear();
    }

    /// Get the number of stored conversations
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Returns true if no conversations are stored
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get_all(&self) -> Vec<Conversation> {
        self.conversations.read().await.clone()
    }

    async fn get_by_id(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations
            .read()
            .await
            .iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    async fn create(&self, draft: ConversationDraft) -> Result<Conversation, StoreError> {
        let conversation = Conversation::from_draft(ConversationId::new(), draft, Timestamp::now());
        self.conversations
            .write()
            .await
            .insert(0, conversation.clone());
        Ok(conversation)
    }

    async fn delete(&self, id: ConversationId) -> Result<bool, StoreError> {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|c| c.id() != id);
        Ok(conversations.len() != before)
    }

    async fn modify(
        &self,
        id: ConversationId,
        mutation: ConversationMutation,
    ) -> Result<Option<Conversation>, StoreError> {
        let mut conversations = self.conversations.write().await;
        let Some(slot) = conversations.iter_mut().find(|c| c.id() == id) else {
            return Ok(None);
        };

        // Mutate a copy so a rejected mutation leaves the stored value intact.
        let mut updated = slot.clone();
        mutation(&mut updated).map_err(StoreError::Rejected)?;
        *slot = updated.clone();
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::persona::{PersonaCatalog, PersonaId};

    fn draft(key: &str) -> ConversationDraft {
        let profile = PersonaCatalog::builtin().resolve(&PersonaId::new(key).unwrap());
        ConversationDraft::individual(&profile)
    }

    #[tokio::test]
    async fn create_inserts_newest_first() {
        let store = InMemoryConversationStore::new();
        let first = store.create(draft("einstein")).await.unwrap();
        let second = store.create(draft("curie")).await.unwrap();

        let all = store.get_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), second.id());
        assert_eq!(all[1].id(), first.id());
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let store = InMemoryConversationStore::new();
        let a = store.create(draft("einstein")).await.unwrap();
        let b = store.create(draft("einstein")).await.unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_unknown() {
        let store = InMemoryConversationStore::new();
        assert!(store.get_by_id(ConversationId::new()).await.is_none());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(draft("einstein")).await.unwrap();

        assert!(store.delete(conv.id()).await.unwrap());
        assert!(!store.delete(conv.id()).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn add_message_appends_and_persists() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(draft("einstein")).await.unwrap();

        let updated = store
            .add_message(conv.id(), Message::user("Hi"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.message_count(), 2);

        let reloaded = store.get_by_id(conv.id()).await.unwrap();
        assert_eq!(reloaded.last_message().unwrap().content(), "Hi");
    }

    #[tokio::test]
    async fn add_message_to_missing_conversation_is_absent() {
        let store = InMemoryConversationStore::new();
        let result = store
            .add_message(ConversationId::new(), Message::user("Hi"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn update_title_renames() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(draft("curie")).await.unwrap();

        let renamed = store
            .update_title(conv.id(), "Radioactivity".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title(), "Radioactivity");
    }

    #[tokio::test]
    async fn rejected_mutation_leaves_conversation_unchanged() {
        let store = InMemoryConversationStore::new();
        let conv = store.create(draft("curie")).await.unwrap();

        let result = store
            .modify(
                conv.id(),
                Box::new(|c| {
                    c.append(Message::user("should not persist"));
                    Err(DomainError::new(ErrorCode::NotAGroup, "nope"))
                }),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert_eq!(store.get_by_id(conv.id()).await.unwrap(), conv);
    }
}
