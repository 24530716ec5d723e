//! Conversation engine - message dispatch and group membership.
//!
//! Sending a message always persists the user's text first, then asks the
//! participating personas to reply:
//!
//! - **Individual**: one call; any failure (including timeout) is replaced
//!   by an apology from the persona so the conversation always continues.
//! - **Group**: one call per participant, all in flight together, each
//!   after a randomized delay. Replies are appended in arrival order as they
//!   complete; a failed participant is skipped without substitute text.
//!
//! Every call runs on its own task and appends its own reply, so abandoning
//! a send does not lose replies that are already on their way.
//!
//! Membership rule violations (sixth member, last member, duplicate) are
//! logged no-ops. Only store failures surface as errors.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::conversation::{
    Conversation, ConversationDraft, ConversationKind, Message, DEFAULT_GROUP_PARTICIPANTS,
    MAX_GROUP_PARTICIPANTS,
};
use crate::domain::foundation::{ConversationId, DomainError};
use crate::domain::persona::{PersonaCatalog, PersonaId, PersonaProfile};
use crate::ports::{
    ChatRequest, ConversationStore, HistoryTurn, PersonaReply, PersonaResponder, ResponderError,
    StoreError,
};

/// Reply shown in an individual chat when the persona could not answer.
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I'm having trouble responding right now. Please try again in a moment.";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Timing for persona dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Lower bound of the delay before each group participant is called.
    pub min_delay: Duration,
    /// Upper bound of the delay before each group participant is called.
    pub max_delay: Duration,
    /// Bound on a single responder call; expiry counts as a failure.
    pub responder_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(800),
            max_delay: Duration::from_millis(2000),
            responder_timeout: Duration::from_secs(30),
        }
    }
}

impl DispatchConfig {
    /// No staggering; replies are requested immediately.
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_delay_range(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min.min(max);
        self.max_delay = max.max(min);
        self
    }

    pub fn with_responder_timeout(mut self, timeout: Duration) -> Self {
        self.responder_timeout = timeout;
        self
    }

    fn sample_delay(&self, rng: &mut impl Rng) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        rng.gen_range(self.min_delay..=self.max_delay)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events and errors
// ─────────────────────────────────────────────────────────────────────────────

/// Progress notifications emitted while a message is dispatched.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A message was persisted to the conversation.
    MessageAppended {
        conversation_id: ConversationId,
        message: Message,
    },
    /// A group participant failed to reply and was skipped.
    ResponderSkipped {
        conversation_id: ConversationId,
        persona_id: PersonaId,
        reason: String,
    },
}

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Message text is empty after trimming.
    #[error("Validation error: message content cannot be empty")]
    EmptyMessage,

    /// Input failed a domain rule that callers must see (e.g. blank title).
    #[error("Validation error: {0}")]
    Invalid(DomainError),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Orchestrates conversations over a store and a persona responder.
pub struct ConversationEngine {
    store: Arc<dyn ConversationStore>,
    responder: Arc<dyn PersonaResponder>,
    catalog: Arc<PersonaCatalog>,
    dispatch: DispatchConfig,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        responder: Arc<dyn PersonaResponder>,
        catalog: Arc<PersonaCatalog>,
    ) -> Self {
        Self {
            store,
            responder,
            catalog,
            dispatch: DispatchConfig::default(),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    // ─────────────────────────────────────────────────────────────────────
    // Creation and management
    // ─────────────────────────────────────────────────────────────────────

    /// Starts a one-on-one chat seeded with the persona's greeting.
    pub async fn create_individual(
        &self,
        persona: PersonaId,
    ) -> Result<Conversation, EngineError> {
        let profile = self.catalog.resolve(&persona);
        let conversation = self
            .store
            .create(ConversationDraft::individual(&profile))
            .await?;

        tracing::info!(
            conversation_id = %conversation.id(),
            persona = %persona,
            "individual conversation created"
        );
        Ok(conversation)
    }

    /// Starts a group discussion seeded with a welcome notice.
    ///
    /// Duplicates are dropped, the list is cut to the group limit, and an
    /// empty list means the default pairing.
    pub async fn create_group(
        &self,
        personas: Vec<PersonaId>,
    ) -> Result<Conversation, EngineError> {
        let profiles: Vec<PersonaProfile> = group_members(personas)
            .iter()
            .map(|id| self.catalog.resolve(id))
            .collect();
        let conversation = self
            .store
            .create(ConversationDraft::group(&profiles))
            .await?;

        tracing::info!(
            conversation_id = %conversation.id(),
            participants = conversation.participants().len(),
            "group conversation created"
        );
        Ok(conversation)
    }

    /// All conversations, newest first.
    pub async fn list(&self) -> Vec<Conversation> {
        self.store.get_all().await
    }

    pub async fn get(&self, id: ConversationId) -> Option<Conversation> {
        self.store.get_by_id(id).await
    }

    /// Replaces the title. Returns `None` if the conversation is gone.
    ///
    /// # Errors
    ///
    /// - `Invalid` if the title is blank
    pub async fn rename(
        &self,
        id: ConversationId,
        title: impl Into<String>,
    ) -> Result<Option<Conversation>, EngineError> {
        match self.store.update_title(id, title.into()).await {
            Ok(updated) => Ok(updated),
            Err(StoreError::Rejected(err)) => Err(EngineError::Invalid(err)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: ConversationId) -> Result<bool, EngineError> {
        let removed = self.store.delete(id).await?;
        tracing::info!(conversation_id = %id, removed, "conversation deleted");
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Membership
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a persona to a group discussion.
    ///
    /// Returns the conversation as stored afterwards (unchanged when the
    /// request breaks a membership rule), or `None` if it does not exist.
    pub async fn add_participant(
        &self,
        id: ConversationId,
        persona: PersonaId,
    ) -> Result<Option<Conversation>, EngineError> {
        let catalog = Arc::clone(&self.catalog);
        let result = self
            .store
            .modify(
                id,
                Box::new(move |conversation| conversation.add_participant(persona, &catalog)),
            )
            .await;
        self.membership_outcome(id, result).await
    }

    /// Removes a persona from a group discussion. Same contract as
    /// [`add_participant`](Self::add_participant).
    pub async fn remove_participant(
        &self,
        id: ConversationId,
        persona: PersonaId,
    ) -> Result<Option<Conversation>, EngineError> {
        let catalog = Arc::clone(&self.catalog);
        let result = self
            .store
            .modify(
                id,
                Box::new(move |conversation| conversation.remove_participant(&persona, &catalog)),
            )
            .await;
        self.membership_outcome(id, result).await
    }

    async fn membership_outcome(
        &self,
        id: ConversationId,
        result: Result<Option<Conversation>, StoreError>,
    ) -> Result<Option<Conversation>, EngineError> {
        match result {
            Ok(updated) => Ok(updated),
            Err(err) => match err.as_rejection() {
                Some(rejection) => {
                    tracing::info!(
                        conversation_id = %id,
                        code = %rejection.code,
                        "membership change ignored: {}",
                        rejection.message
                    );
                    Ok(self.store.get_by_id(id).await)
                }
                None => Err(err.into()),
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messaging
    // ─────────────────────────────────────────────────────────────────────

    /// Sends a user message and collects the replies.
    ///
    /// Returns the messages appended by this call (the user's message first,
    /// then replies in arrival order), or `None` if the conversation does
    /// not exist.
    ///
    /// Persona calls run as spawned tasks. Dropping the returned future
    /// stops the wait, not the calls: each reply is still appended when it
    /// arrives, provided the conversation still exists.
    ///
    /// # Errors
    ///
    /// - `EmptyMessage` if `text` is blank
    /// - `Store` if persisting the user's message or any reply fails
    pub async fn send_message(
        &self,
        id: ConversationId,
        text: &str,
    ) -> Result<Option<Vec<Message>>, EngineError> {
        self.send_message_with_events(id, text, None).await
    }

    /// Like [`send_message`](Self::send_message), also reporting each append
    /// and each skipped participant on `events` as it happens.
    pub async fn send_message_with_events(
        &self,
        id: ConversationId,
        text: &str,
        events: Option<mpsc::Sender<ConversationEvent>>,
    ) -> Result<Option<Vec<Message>>, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyMessage);
        }

        let user_message = Message::user(text);
        let Some(conversation) = self.store.add_message(id, user_message.clone()).await? else {
            tracing::debug!(conversation_id = %id, "send to missing conversation ignored");
            return Ok(None);
        };
        let user_message = conversation
            .last_message()
            .cloned()
            .unwrap_or(user_message);
        emit(
            &events,
            ConversationEvent::MessageAppended {
                conversation_id: id,
                message: user_message.clone(),
            },
        )
        .await;

        let dispatch = ReplyDispatch {
            store: Arc::clone(&self.store),
            responder: Arc::clone(&self.responder),
            catalog: Arc::clone(&self.catalog),
            responder_timeout: self.dispatch.responder_timeout,
            conversation: Arc::new(conversation),
            text: Arc::from(text),
            events,
        };

        let mut appended = vec![user_message];
        appended.extend(self.spawn_replies(dispatch).await?);
        Ok(Some(appended))
    }

    /// Spawns one reply task per participant and waits for all of them.
    ///
    /// A failing task never cancels the others; the first store error is
    /// reported once every task has finished.
    async fn spawn_replies(&self, dispatch: ReplyDispatch) -> Result<Vec<Message>, EngineError> {
        let conversation = Arc::clone(&dispatch.conversation);
        let participants = conversation.participants();

        let mut pending: FuturesUnordered<JoinHandle<Result<Option<Message>, StoreError>>> =
            match conversation.kind() {
                ConversationKind::Individual => participants
                    .first()
                    .cloned()
                    .map(|persona| tokio::spawn(dispatch.clone().individual_reply(persona)))
                    .into_iter()
                    .collect(),
                ConversationKind::Group => {
                    let delays: Vec<Duration> = {
                        let mut rng = rand::thread_rng();
                        participants
                            .iter()
                            .map(|_| self.dispatch.sample_delay(&mut rng))
                            .collect()
                    };
                    tracing::debug!(
                        conversation_id = %conversation.id(),
                        participants = participants.len(),
                        "dispatching group message"
                    );
                    participants
                        .iter()
                        .cloned()
                        .zip(delays)
                        .map(|(persona, delay)| {
                            tokio::spawn(dispatch.clone().group_reply(persona, delay))
                        })
                        .collect()
                }
            };
        drop(dispatch);

        let mut appended = Vec::new();
        let mut failure = None;
        while let Some(joined) = pending.next().await {
            match joined {
                Ok(Ok(Some(message))) => appended.push(message),
                Ok(Ok(None)) => {}
                Ok(Err(err)) => {
                    tracing::error!(
                        conversation_id = %conversation.id(),
                        error = %err,
                        "failed to persist persona reply"
                    );
                    failure.get_or_insert(err);
                }
                Err(err) => {
                    tracing::error!(
                        conversation_id = %conversation.id(),
                        error = %err,
                        "reply task did not complete"
                    );
                }
            }
        }

        if conversation.kind() == ConversationKind::Group {
            tracing::info!(
                conversation_id = %conversation.id(),
                replies = appended.len(),
                participants = participants.len(),
                "group dispatch finished"
            );
        }
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(appended),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reply tasks
// ─────────────────────────────────────────────────────────────────────────────

/// Everything one reply task needs, owned so the task outlives its caller.
#[derive(Clone)]
struct ReplyDispatch {
    store: Arc<dyn ConversationStore>,
    responder: Arc<dyn PersonaResponder>,
    catalog: Arc<PersonaCatalog>,
    responder_timeout: Duration,
    /// Snapshot taken right after the user's message was stored.
    conversation: Arc<Conversation>,
    text: Arc<str>,
    events: Option<mpsc::Sender<ConversationEvent>>,
}

impl ReplyDispatch {
    /// Individual chat: a failed call becomes an apology.
    async fn individual_reply(self, persona: PersonaId) -> Result<Option<Message>, StoreError> {
        let profile = self.catalog.resolve(&persona);

        let message = match self.call_persona(&persona).await {
            Ok(reply) => {
                Message::persona(profile.snapshot(), reply.content).with_timestamp(reply.timestamp)
            }
            Err(err) => {
                tracing::warn!(
                    conversation_id = %self.conversation.id(),
                    persona = %persona,
                    error = %err,
                    retryable = err.is_retryable(),
                    "persona reply failed, sending apology"
                );
                Message::persona(profile.snapshot(), APOLOGY_MESSAGE)
            }
        };

        self.append_reply(message).await
    }

    /// Group discussion: waits out the stagger, then replies or is skipped.
    async fn group_reply(
        self,
        persona: PersonaId,
        delay: Duration,
    ) -> Result<Option<Message>, StoreError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.call_persona(&persona).await {
            Ok(reply) => {
                let profile = self.catalog.resolve(&persona);
                let message = Message::persona(profile.snapshot(), reply.content)
                    .with_timestamp(reply.timestamp);
                self.append_reply(message).await
            }
            Err(err) => {
                tracing::warn!(
                    conversation_id = %self.conversation.id(),
                    persona = %persona,
                    error = %err,
                    retryable = err.is_retryable(),
                    "persona reply failed, skipping participant"
                );
                emit(
                    &self.events,
                    ConversationEvent::ResponderSkipped {
                        conversation_id: self.conversation.id(),
                        persona_id: persona,
                        reason: err.to_string(),
                    },
                )
                .await;
                Ok(None)
            }
        }
    }

    /// One bounded responder call with this persona's prior turns.
    async fn call_persona(&self, persona: &PersonaId) -> Result<PersonaReply, ResponderError> {
        let request = ChatRequest::new(persona.clone(), &*self.text)
            .with_history(history_for(&self.conversation, persona));
        let timeout = self.responder_timeout;

        tokio::time::timeout(timeout, self.responder.chat(request))
            .await
            .map_err(|_| ResponderError::Timeout {
                timeout_secs: timeout.as_secs(),
            })?
    }

    /// Persists a reply. A conversation deleted mid-dispatch drops it.
    async fn append_reply(&self, message: Message) -> Result<Option<Message>, StoreError> {
        let id = self.conversation.id();
        let Some(updated) = self.store.add_message(id, message).await? else {
            tracing::debug!(conversation_id = %id, "reply discarded, conversation no longer exists");
            return Ok(None);
        };
        let stored = updated.last_message().cloned();
        if let Some(message) = &stored {
            emit(
                &self.events,
                ConversationEvent::MessageAppended {
                    conversation_id: id,
                    message: message.clone(),
                },
            )
            .await;
        }
        Ok(stored)
    }
}

/// Prior turns between the user and `persona`, excluding the message being
/// answered (the last one in the log).
fn history_for(conversation: &Conversation, persona: &PersonaId) -> Vec<HistoryTurn> {
    let messages = conversation.messages();
    let prior = &messages[..messages.len().saturating_sub(1)];
    prior
        .iter()
        .filter_map(|message| {
            if message.is_user() {
                Some(HistoryTurn::user(message.content()))
            } else if message.sender().is_persona(persona) {
                Some(HistoryTurn::assistant(message.content()))
            } else {
                None
            }
        })
        .collect()
}

/// Normalizes an initial group membership.
fn group_members(requested: Vec<PersonaId>) -> Vec<PersonaId> {
    let mut members: Vec<PersonaId> = Vec::with_capacity(requested.len());
    for persona in requested {
        if !members.contains(&persona) {
            members.push(persona);
        }
    }
    members.truncate(MAX_GROUP_PARTICIPANTS);

    if members.is_empty() {
        members = DEFAULT_GROUP_PARTICIPANTS
            .iter()
            .filter_map(|key| PersonaId::new(*key).ok())
            .collect();
    }
    members
}

async fn emit(events: &Option<mpsc::Sender<ConversationEvent>>, event: ConversationEvent) {
    if let Some(tx) = events {
        if tx.send(event).await.is_err() {
            tracing::debug!("event receiver dropped");
        }
    }
}
