//! Integration tests for refined-notes export.
//!
//! A conversation is built through the engine, then exported through the
//! pipeline with a mock summarizer and a stub PDF renderer.

use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::Arc;

use genius_minds::adapters::ai::{MockError, MockPersonaResponder, MockSummarizer};
use genius_minds::adapters::storage::InMemoryConversationStore;
use genius_minds::application::{
    ConversationEngine, DispatchConfig, ExportError, ExportPipeline,
};
use genius_minds::domain::export::{strip_markdown, Attribution, ExportFormat, DEFAULT_CATEGORIES};
use genius_minds::domain::persona::{PersonaCatalog, PersonaId};
use genius_minds::ports::{PdfRenderer, RenderError};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct StubPdfRenderer;

#[async_trait]
impl PdfRenderer for StubPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.extend_from_slice(html.as_bytes());
        Ok(bytes)
    }

    async fn is_available(&self) -> bool {
        true
    }
}

struct Harness {
    engine: ConversationEngine,
    pipeline: ExportPipeline,
    summarizer: MockSummarizer,
}

fn harness(summarizer: MockSummarizer) -> Harness {
    let store = Arc::new(InMemoryConversationStore::new());
    let catalog = Arc::new(PersonaCatalog::builtin());
    let engine = ConversationEngine::new(
        store.clone(),
        Arc::new(MockPersonaResponder::new()),
        Arc::clone(&catalog),
    )
    .with_dispatch(DispatchConfig::immediate());
    let pipeline = ExportPipeline::new(
        store,
        Arc::new(summarizer.clone()),
        Arc::new(StubPdfRenderer),
        catalog,
    );
    Harness {
        engine,
        pipeline,
        summarizer,
    }
}

fn pid(key: &str) -> PersonaId {
    PersonaId::new(key).unwrap()
}

const ANALYSIS: &str = "## 1. Core Insights (Bullet Points)\n- **Curiosity** drives discovery\n\n## 2. Key Questions Raised\n* What is _light_?";

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn group_discussion_exports_in_every_format() {
    let h = harness(
        MockSummarizer::new()
            .with_response(ANALYSIS)
            .with_response(ANALYSIS)
            .with_response(ANALYSIS)
            .with_attribution(Attribution::new("Cerebras", "llama3.1-8b")),
    );
    let conversation = h.engine.create_group(vec![]).await.unwrap();
    h.engine.send_message(conversation.id(), "What is light?").await.unwrap();

    let md = h
        .pipeline
        .export(conversation.id(), &[], ExportFormat::Markdown)
        .await
        .unwrap();
    let md_text = md.as_text().unwrap();
    assert!(md_text.starts_with("# Conversation Analysis: Discussion with Albert, Marie"));
    assert!(md_text.contains("*Intelligent Analysis powered by Cerebras AI*"));
    assert!(md_text.contains("Albert Einstein, Marie Curie"));
    assert!(md_text.contains("**Curiosity**"));
    assert_eq!(md.filename, "DiscussionwithAlbertMarie_refined_notes.md");

    let pdf = h
        .pipeline
        .export(conversation.id(), &[], ExportFormat::Pdf)
        .await
        .unwrap();
    assert!(pdf.content.starts_with(b"%PDF"));
    assert_eq!(pdf.content_type, "application/pdf");
    assert_eq!(pdf.filename, "DiscussionwithAlbertMarie_refined_notes.pdf");

    let doc = h
        .pipeline
        .export(conversation.id(), &[], ExportFormat::Word)
        .await
        .unwrap();
    let doc_text = doc.as_text().unwrap();
    assert!(doc_text.contains("Curiosity drives discovery"));
    assert!(!doc_text.contains("**"));
    assert_eq!(doc.filename, "DiscussionwithAlbertMarie_refined_notes.doc");
}

#[tokio::test]
async fn transcript_excludes_system_messages() {
    let h = harness(MockSummarizer::new());
    let conversation = h.engine.create_group(vec![]).await.unwrap();
    h.engine.add_participant(conversation.id(), pid("feynman")).await.unwrap();
    h.engine.send_message(conversation.id(), "Hello all").await.unwrap();

    h.pipeline
        .export(conversation.id(), &[], ExportFormat::Markdown)
        .await
        .unwrap();

    let request = &h.summarizer.get_calls()[0];
    assert!(request.transcript.starts_with("USER: Hello all"));
    assert!(!request.transcript.contains("Welcome!"));
    assert!(!request.transcript.contains("has joined"));
    assert_eq!(request.categories, DEFAULT_CATEGORIES.map(String::from).to_vec());
}

#[tokio::test]
async fn export_without_content_fails_fast() {
    let h = harness(MockSummarizer::new());
    let conversation = h.engine.create_group(vec![]).await.unwrap();

    let result = h
        .pipeline
        .export(conversation.id(), &[], ExportFormat::Pdf)
        .await;

    assert!(matches!(result, Err(ExportError::EmptyConversation)));
    assert_eq!(h.summarizer.call_count(), 0);
}

#[tokio::test]
async fn summarizer_failure_leaves_conversation_untouched() {
    let h = harness(MockSummarizer::new().with_error(MockError::Http { status: 500 }));
    let conversation = h.engine.create_individual(pid("angelou")).await.unwrap();
    h.engine.send_message(conversation.id(), "Tell me a story").await.unwrap();
    let before = h.engine.get(conversation.id()).await.unwrap();

    let result = h
        .pipeline
        .export(conversation.id(), &[], ExportFormat::Markdown)
        .await;

    assert!(matches!(result, Err(ExportError::Summarization(_))));
    assert_eq!(h.engine.get(conversation.id()).await.unwrap(), before);
}

// =============================================================================
// Markdown stripping
// =============================================================================

proptest! {
    #[test]
    fn stripping_is_idempotent(text in "[a-z #*_`\\-\\[\\]()\n]{0,80}") {
        let once = strip_markdown(&text);
        prop_assert_eq!(strip_markdown(&once), once);
    }
}
