//! Integration tests for conversation lifecycle and dispatch.
//!
//! These tests drive the public engine API end to end:
//! 1. Conversations are created and persisted through a store
//! 2. Messages are dispatched to mock persona responders
//! 3. Group membership rules hold across operations
//! 4. Conversations survive a reload from disk

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use genius_minds::adapters::ai::{
    canned_lines, MockError, MockPersonaResponder, SimulatedPersonaResponder,
};
use genius_minds::adapters::storage::{FileConversationStore, InMemoryConversationStore};
use genius_minds::application::{ConversationEngine, DispatchConfig, APOLOGY_MESSAGE};
use genius_minds::domain::conversation::{ConversationKind, Sender, MAX_GROUP_PARTICIPANTS};
use genius_minds::domain::persona::{PersonaCatalog, PersonaId};
use genius_minds::ports::ConversationStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn pid(key: &str) -> PersonaId {
    PersonaId::new(key).unwrap()
}

fn engine(store: Arc<dyn ConversationStore>, responder: MockPersonaResponder) -> ConversationEngine {
    ConversationEngine::new(store, Arc::new(responder), Arc::new(PersonaCatalog::builtin()))
        .with_dispatch(DispatchConfig::immediate())
}

// =============================================================================
// Individual chat
// =============================================================================

#[tokio::test]
async fn individual_hi_yields_greeting_user_and_reply() {
    let store = Arc::new(InMemoryConversationStore::new());
    let engine = engine(store.clone(), MockPersonaResponder::new());

    let conversation = engine.create_individual(pid("einstein")).await.unwrap();
    engine.send_message(conversation.id(), "Hi").await.unwrap();

    let stored = store.get_by_id(conversation.id()).await.unwrap();
    let messages = stored.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].sender(), &Sender::Persona(pid("einstein")));
    assert_eq!(messages[1].sender(), &Sender::User);
    assert_eq!(messages[1].content(), "Hi");
    assert_eq!(messages[2].sender(), &Sender::Persona(pid("einstein")));
}

#[tokio::test]
async fn user_message_survives_total_responder_failure() {
    let store = Arc::new(InMemoryConversationStore::new());
    let responder = MockPersonaResponder::new().with_error(
        pid("curie"),
        MockError::Timeout { timeout_secs: 30 },
    );
    let engine = engine(store.clone(), responder);

    let conversation = engine.create_individual(pid("curie")).await.unwrap();
    engine.send_message(conversation.id(), "Are you there?").await.unwrap();

    let stored = store.get_by_id(conversation.id()).await.unwrap();
    assert_eq!(stored.messages()[1].content(), "Are you there?");
    assert_eq!(stored.last_message().unwrap().content(), APOLOGY_MESSAGE);
}

#[tokio::test]
async fn simulated_responder_answers_in_character() {
    let store = Arc::new(InMemoryConversationStore::new());
    let engine = ConversationEngine::new(
        store.clone(),
        Arc::new(SimulatedPersonaResponder::with_seed(7)),
        Arc::new(PersonaCatalog::builtin()),
    )
    .with_dispatch(DispatchConfig::immediate());

    let conversation = engine.create_individual(pid("feynman")).await.unwrap();
    let appended = engine
        .send_message(conversation.id(), "What is fun?")
        .await
        .unwrap()
        .unwrap();

    let reply = appended.last().unwrap();
    assert_eq!(reply.sender(), &Sender::Persona(pid("feynman")));
    assert!(canned_lines("feynman")
        .iter()
        .any(|line| *line == reply.content()));
}

// =============================================================================
// Group discussion
// =============================================================================

#[tokio::test]
async fn group_hi_yields_two_persona_replies() {
    let store = Arc::new(InMemoryConversationStore::new());
    let engine = engine(store.clone(), MockPersonaResponder::new());

    let conversation = engine
        .create_group(vec![pid("einstein"), pid("curie")])
        .await
        .unwrap();
    engine.send_message(conversation.id(), "Hi").await.unwrap();

    let stored = store.get_by_id(conversation.id()).await.unwrap();
    let after_user: Vec<_> = stored
        .messages()
        .iter()
        .skip_while(|m| !m.is_user())
        .collect();
    assert_eq!(after_user[0].content(), "Hi");
    let replies: Vec<_> = after_user[1..]
        .iter()
        .filter_map(|m| m.sender().persona_id().cloned())
        .collect();
    assert_eq!(replies.len(), 2);
    assert!(replies.contains(&pid("einstein")));
    assert!(replies.contains(&pid("curie")));
}

#[tokio::test]
async fn group_with_one_failure_appends_one_reply() {
    let store = Arc::new(InMemoryConversationStore::new());
    let responder =
        MockPersonaResponder::new().with_error(pid("einstein"), MockError::Http { status: 502 });
    let engine = engine(store.clone(), responder);

    let conversation = engine.create_group(vec![]).await.unwrap();
    engine.send_message(conversation.id(), "Hi").await.unwrap();

    let stored = store.get_by_id(conversation.id()).await.unwrap();
    let persona_replies: Vec<_> = stored
        .messages()
        .iter()
        .filter(|m| m.sender().persona_id().is_some())
        .collect();
    assert_eq!(persona_replies.len(), 1);
    assert_eq!(persona_replies[0].sender(), &Sender::Persona(pid("curie")));
}

#[tokio::test(start_paused = true)]
async fn reply_to_deleted_conversation_is_discarded() {
    let store = Arc::new(InMemoryConversationStore::new());
    let responder =
        MockPersonaResponder::new().with_delay(pid("einstein"), Duration::from_secs(5));
    let engine = Arc::new(engine(store.clone(), responder));

    let conversation = engine.create_individual(pid("einstein")).await.unwrap();
    let id = conversation.id();
    let sending = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.send_message(id, "Hi").await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(engine.delete(id).await.unwrap());

    let appended = sending.await.unwrap().unwrap().unwrap();
    assert_eq!(appended.len(), 1);
    assert!(store.get_by_id(id).await.is_none());
}

// =============================================================================
// Membership invariants
// =============================================================================

#[tokio::test]
async fn group_size_stays_within_bounds() {
    let store = Arc::new(InMemoryConversationStore::new());
    let engine = engine(store.clone(), MockPersonaResponder::new());
    let conversation = engine.create_group(vec![pid("einstein")]).await.unwrap();

    for key in ["curie", "davinci", "feynman", "angelou", "gandhi", "hawking"] {
        engine
            .add_participant(conversation.id(), pid(key))
            .await
            .unwrap();
    }
    let full = store.get_by_id(conversation.id()).await.unwrap();
    assert_eq!(full.participants().len(), MAX_GROUP_PARTICIPANTS);
    assert!(!full.has_participant(&pid("gandhi")));

    for key in ["einstein", "curie", "davinci", "feynman", "angelou"] {
        engine
            .remove_participant(conversation.id(), pid(key))
            .await
            .unwrap();
    }
    let last = store.get_by_id(conversation.id()).await.unwrap();
    assert_eq!(last.participants(), &[pid("angelou")]);
    assert_eq!(last.kind(), ConversationKind::Group);
}

#[tokio::test]
async fn messages_only_grow() {
    let store = Arc::new(InMemoryConversationStore::new());
    let engine = engine(store.clone(), MockPersonaResponder::new());
    let conversation = engine.create_group(vec![]).await.unwrap();
    let mut previous = conversation.message_count();

    engine.send_message(conversation.id(), "One").await.unwrap();
    engine.add_participant(conversation.id(), pid("twain")).await.unwrap();
    engine.remove_participant(conversation.id(), pid("nobody")).await.unwrap();
    engine.rename(conversation.id(), "Renamed").await.unwrap();
    engine.send_message(conversation.id(), "Two").await.unwrap();

    let stored = store.get_by_id(conversation.id()).await.unwrap();
    assert!(stored.message_count() >= previous);
    previous = stored.message_count();
    engine.add_participant(conversation.id(), pid("twain")).await.unwrap();
    assert_eq!(
        store.get_by_id(conversation.id()).await.unwrap().message_count(),
        previous
    );
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn conversation_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conversations.json");
    let engine = engine(
        Arc::new(FileConversationStore::new(&path)),
        MockPersonaResponder::new(),
    );

    let conversation = engine.create_group(vec![]).await.unwrap();
    engine.send_message(conversation.id(), "Hello minds").await.unwrap();
    let before = engine.get(conversation.id()).await.unwrap();

    let reloaded = FileConversationStore::new(&path)
        .get_by_id(conversation.id())
        .await
        .unwrap();

    assert_eq!(reloaded.id(), before.id());
    assert_eq!(reloaded.title(), before.title());
    assert_eq!(reloaded.kind(), before.kind());
    assert_eq!(reloaded.participants(), before.participants());
    assert_eq!(reloaded.message_count(), before.message_count());
    for (a, b) in reloaded.messages().iter().zip(before.messages()) {
        assert_eq!(a.content(), b.content());
        assert_eq!(a.sender(), b.sender());
        assert_eq!(a.timestamp(), b.timestamp());
    }
}

#[tokio::test]
async fn list_is_newest_first() {
    let store = Arc::new(InMemoryConversationStore::new());
    let engine = engine(store, MockPersonaResponder::new());

    let first = engine.create_individual(pid("einstein")).await.unwrap();
    let second = engine.create_group(vec![]).await.unwrap();

    let listed = engine.list().await;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id(), second.id());
    assert_eq!(listed[1].id(), first.id());
}
