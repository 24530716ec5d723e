//! File-based Conversation Store Adapter
//!
//! Persists the whole conversation collection as one JSON document named
//! after [`STORAGE_KEY`]. Every mutation is a full read-modify-write of that
//! document, serialized by a lock shared between clones of one store.
//! Separate stores opened on the same path do not share it; open the file
//! once and clone the handle.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::conversation::{Conversation, ConversationDraft};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationMutation, ConversationStore, StoreError, STORAGE_KEY};

/// File-based storage for conversations
#[derive(Debug, Clone)]
pub struct FileConversationStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileConversationStore {
    /// Create a store backed by the JSON file at `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileConversationStore::new("./data/genius_minds_conversations.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Create a store in `dir` using the standard file name
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", STORAGE_KEY)))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection; missing or unreadable data reads as empty
    async fn read_all(&self) -> Vec<Conversation> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read conversations, treating as empty");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<Conversation>>(&raw) {
            Ok(conversations) => conversations,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt conversation data, treating as empty");
                Vec::new()
            }
        }
    }

    /// Write the whole collection via a temp file and rename
    async fn write_all(&self, conversations: &[Conversation]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::IoError(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(conversations)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn get_all(&self) -> Vec<Conversation> {
        let _guard = self.write_lock.lock().await;
        self.read_all().await
    }

    async fn get_by_id(&self, id: ConversationId) -> Option<Conversation> {
        self.get_all().await.into_iter().find(|c| c.id() == id)
    }

    async fn create(&self, draft: ConversationDraft) -> Result<Conversation, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut conversations = self.read_all().await;

        let conversation = Conversation::from_draft(ConversationId::new(), draft, Timestamp::now());
        conversations.insert(0, conversation.clone());
        self.write_all(&conversations).await?;

        Ok(conversation)
    }

    async fn delete(&self, id: ConversationId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut conversations = self.read_all().await;

        let before = conversations.len();
        conversations.retain(|c| c.id() != id);
        if conversations.len() == before {
            return Ok(false);
        }

        self.write_all(&conversations).await?;
        Ok(true)
    }

    async fn modify(
        &self,
        id: ConversationId,
        mutation: ConversationMutation,
    ) -> Result<Option<Conversation>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut conversations = self.read_all().await;

        let Some(slot) = conversations.iter_mut().find(|c| c.id() == id) else {
            return Ok(None);
        };
        mutation(slot).map_err(StoreError::Rejected)?;
        let updated = slot.clone();

        self.write_all(&conversations).await?;
        Ok(Some(updated))
    }
}
