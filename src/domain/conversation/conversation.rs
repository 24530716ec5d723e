//! Conversation aggregate - the unit of persistence and membership rules.
//!
//! A conversation owns its message log and participant list. Individual
//! conversations have exactly one persona for their whole lifetime; group
//! conversations hold between one and [`MAX_GROUP_PARTICIPANTS`] personas and
//! change membership only through [`Conversation::add_participant`] and
//! [`Conversation::remove_participant`], each of which also logs a system
//! message in the same mutation.

use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, Timestamp};
use crate::domain::persona::{PersonaCatalog, PersonaId, PersonaProfile};

/// Upper bound on group membership.
pub const MAX_GROUP_PARTICIPANTS: usize = 5;

/// Participants of a group created without an explicit selection.
pub const DEFAULT_GROUP_PARTICIPANTS: [&str; 2] = ["einstein", "curie"];

/// Whether a conversation is one-on-one or a group discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    Individual,
    Group,
}

/// Conversation content before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationDraft {
    pub title: String,
    pub kind: ConversationKind,
    pub participants: Vec<PersonaId>,
    pub messages: Vec<Message>,
}

impl ConversationDraft {
    /// Draft for a one-on-one chat, seeded with the persona's greeting.
    pub fn individual(profile: &PersonaProfile) -> Self {
        Self {
            title: individual_title(profile),
            kind: ConversationKind::Individual,
            participants: vec![profile.id.clone()],
            messages: vec![Message::persona(profile.snapshot(), profile.greeting.clone())],
        }
    }

    /// Draft for a group discussion, seeded with a system welcome.
    ///
    /// Profiles are taken as given; callers de-duplicate and bound the list.
    pub fn group(profiles: &[PersonaProfile]) -> Self {
        let full_names = profiles
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            title: group_title(profiles),
            kind: ConversationKind::Group,
            participants: profiles.iter().map(|p| p.id.clone()).collect(),
            messages: vec![Message::system(format!(
                "Welcome! You're now in discussion with {}. Ask any question to start the conversation.",
                full_names
            ))],
        }
    }
}

/// Title of a one-on-one chat: `"Chat with Albert Einstein"`.
pub fn individual_title(profile: &PersonaProfile) -> String {
    format!("Chat with {}", profile.name)
}

/// Title of a group discussion: `"Discussion with Albert, Marie"`.
pub fn group_title(profiles: &[PersonaProfile]) -> String {
    let first_names = profiles
        .iter()
        .map(|p| p.first_name())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Discussion with {}", first_names)
}

/// A conversation between the user and one or more personas.
///
/// # Invariants
///
/// - `participants` has no duplicates
/// - Individual: exactly one participant, never changes
/// - Group: `1 <= participants.len() <= MAX_GROUP_PARTICIPANTS` after any
///   membership change
/// - Message timestamps are non-decreasing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: ConversationId,
    title: String,
    kind: ConversationKind,
    participants: Vec<PersonaId>,
    messages: Vec<Message>,
    last_activity: Timestamp,
    created_at: Timestamp,
}

impl Conversation {
    /// Materializes a draft with a store-assigned identity.
    pub fn from_draft(id: ConversationId, draft: ConversationDraft, created_at: Timestamp) -> Self {
        let mut conversation = Self {
            id,
            title: draft.title,
            kind: draft.kind,
            participants: Vec::new(),
            messages: Vec::with_capacity(draft.messages.len()),
            last_activity: created_at,
            created_at,
        };
        for participant in draft.participants {
            if !conversation.participants.contains(&participant) {
                conversation.participants.push(participant);
            }
        }
        for message in draft.messages {
            conversation.append(message);
        }
        conversation
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ConversationKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind == ConversationKind::Group
    }

    pub fn participants(&self) -> &[PersonaId] {
        &self.participants
    }

    pub fn has_participant(&self, id: &PersonaId) -> bool {
        self.participants.contains(id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn last_activity(&self) -> Timestamp {
        self.last_activity
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a message and bumps `last_activity`.
    ///
    /// A timestamp older than the current tail is raised to the tail's, so
    /// the log stays ordered even when replies carry remote clocks.
    pub fn append(&mut self, message: Message) {
        let floor = self
            .messages
            .last()
            .map(|m| m.timestamp())
            .unwrap_or(self.created_at);
        let message = if message.timestamp() < floor {
            message.with_timestamp(floor)
        } else {
            message
        };
        self.last_activity = message.timestamp().max(self.last_activity);
        self.messages.push(message);
    }

    /// Sets a custom title. It holds until the next membership change.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is blank
    pub fn rename(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        self.title = title;
        Ok(())
    }

    /// Adds a persona to a group discussion.
    ///
    /// On success the participant list, the derived title, and a join notice
    /// are all updated; on error nothing changes.
    ///
    /// # Errors
    ///
    /// - `NotAGroup` for individual conversations
    /// - `DuplicateParticipant` if the persona is already present
    /// - `ParticipantLimitReached` if the group is full
    pub fn add_participant(
        &mut self,
        persona: PersonaId,
        catalog: &PersonaCatalog,
    ) -> Result<(), DomainError> {
        self.ensure_group()?;
        if self.has_participant(&persona) {
            return Err(DomainError::new(
                ErrorCode::DuplicateParticipant,
                "Persona is already in this discussion",
            )
            .with_detail("persona", persona.as_str()));
        }
        if self.participants.len() >= MAX_GROUP_PARTICIPANTS {
            return Err(DomainError::new(
                ErrorCode::ParticipantLimitReached,
                format!("A discussion holds at most {} personas", MAX_GROUP_PARTICIPANTS),
            )
            .with_detail("persona", persona.as_str()));
        }

        let name = catalog.display_name(&persona);
        self.participants.push(persona);
        self.retitle(catalog);
        self.append(Message::system(format!("{} has joined the discussion.", name)));
        Ok(())
    }

    /// Removes a persona from a group discussion.
    ///
    /// # Errors
    ///
    /// - `NotAGroup` for individual conversations
    /// - `ParticipantNotFound` if the persona is not present
    /// - `LastParticipant` if it is the only remaining member
    pub fn remove_participant(
        &mut self,
        persona: &PersonaId,
        catalog: &PersonaCatalog,
    ) -> Result<(), DomainError> {
        self.ensure_group()?;
        let Some(position) = self.participants.iter().position(|p| p == persona) else {
            return Err(DomainError::new(
                ErrorCode::ParticipantNotFound,
                "Persona is not in this discussion",
            )
            .with_detail("persona", persona.as_str()));
        };
        if self.participants.len() <= 1 {
            return Err(DomainError::new(
                ErrorCode::LastParticipant,
                "A discussion needs at least one persona",
            )
            .with_detail("persona", persona.as_str()));
        }

        self.participants.remove(position);
        self.retitle(catalog);
        self.append(Message::system(format!(
            "{} has left the discussion.",
            catalog.display_name(persona)
        )));
        Ok(())
    }

    fn ensure_group(&self) -> Result<(), DomainError> {
        if !self.is_group() {
            return Err(DomainError::new(
                ErrorCode::NotAGroup,
                "Membership can only change in group discussions",
            )
            .with_detail("conversation_id", self.id.to_string()));
        }
        Ok(())
    }

    fn retitle(&mut self, catalog: &PersonaCatalog) {
        let profiles: Vec<PersonaProfile> =
            self.participants.iter().map(|p| catalog.resolve(p)).collect();
        self.title = group_title(&profiles);
    }
}
