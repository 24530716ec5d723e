//! Message entity for conversations.
//!
//! Messages are immutable records within a conversation's log. Each message
//! has a sender (the user, the system, or a persona), content, and timestamp.
//! Persona messages additionally carry a snapshot of the persona's display
//! metadata taken when the message was created.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{MessageId, Timestamp, ValidationError};
use crate::domain::persona::{PersonaId, PersonaSnapshot};

/// Author of a message.
///
/// Serialized as a bare string: `"user"`, `"system"`, or the persona key.
/// Persona keys can never collide with the two markers because `PersonaId`
/// rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    /// The human user.
    User,
    /// Conversational scaffolding (welcome, join/leave notices).
    System,
    /// A persona reply.
    Persona(PersonaId),
}

impl Sender {
    /// Returns the persona key if this is a persona sender.
    pub fn persona_id(&self) -> Option<&PersonaId> {
        match self {
            Sender::Persona(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true if this sender is the given persona.
    pub fn is_persona(&self, id: &PersonaId) -> bool {
        self.persona_id() == Some(id)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::System => write!(f, "system"),
            Sender::Persona(id) => write!(f, "{}", id),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Sender::User),
            "system" => Ok(Sender::System),
            _ => Ok(Sender::Persona(PersonaId::new(value)?)),
        }
    }
}

impl From<Sender> for String {
    fn from(sender: Sender) -> Self {
        sender.to_string()
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is unique within its conversation
/// - `persona_ref` is only present on persona messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    content: String,
    sender: Sender,
    timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    persona_ref: Option<PersonaSnapshot>,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(Sender::User, content.into(), None)
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::build(Sender::System, content.into(), None)
    }

    /// Creates a persona message carrying a snapshot of its author.
    pub fn persona(snapshot: PersonaSnapshot, content: impl Into<String>) -> Self {
        Self::build(
            Sender::Persona(snapshot.id.clone()),
            content.into(),
            Some(snapshot),
        )
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        content: String,
        sender: Sender,
        timestamp: Timestamp,
        persona_ref: Option<PersonaSnapshot>,
    ) -> Self {
        Self {
            id,
            content,
            sender,
            timestamp,
            persona_ref,
        }
    }

    /// Overrides the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn build(sender: Sender, content: String, persona_ref: Option<PersonaSnapshot>) -> Self {
        Self {
            id: MessageId::new(),
            content,
            sender,
            timestamp: Timestamp::now(),
            persona_ref,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn persona_ref(&self) -> Option<&PersonaSnapshot> {
        self.persona_ref.as_ref()
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_system(&self) -> bool {
        self.sender == Sender::System
    }
}
