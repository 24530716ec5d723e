//! Export pipeline - conversation to refined notes.
//!
//! Flattens a conversation into a transcript, asks the summarizer for a
//! categorized analysis, wraps it in a notes document, and encodes that as
//! markdown, PDF, or a word-processor HTML document. A summarizer or
//! renderer failure aborts the export; nothing partial is returned.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::Conversation;
use crate::domain::export::{
    resolve_categories, ExportFormat, ExportedDocument, NotesDocument, Transcript,
};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::domain::persona::PersonaCatalog;
use crate::ports::{
    ConversationStore, PdfRenderer, RenderError, SummarizationError, SummarizationResponder,
    SummaryRequest,
};

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Nothing but system notices to analyze; no remote call was made.
    #[error("Conversation has no messages to export")]
    EmptyConversation,

    #[error("Analysis failed: {0}")]
    Summarization(#[from] SummarizationError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Builds refined-notes exports.
pub struct ExportPipeline {
    store: Arc<dyn ConversationStore>,
    summarizer: Arc<dyn SummarizationResponder>,
    pdf_renderer: Arc<dyn PdfRenderer>,
    catalog: Arc<PersonaCatalog>,
}

impl ExportPipeline {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        summarizer: Arc<dyn SummarizationResponder>,
        pdf_renderer: Arc<dyn PdfRenderer>,
        catalog: Arc<PersonaCatalog>,
    ) -> Self {
        Self {
            store,
            summarizer,
            pdf_renderer,
            catalog,
        }
    }

    /// Exports a stored conversation.
    ///
    /// `categories` may be empty, in which case the default set is used.
    pub async fn export(
        &self,
        id: ConversationId,
        categories: &[String],
        format: ExportFormat,
    ) -> Result<ExportedDocument, ExportError> {
        let conversation = self
            .store
            .get_by_id(id)
            .await
            .ok_or(ExportError::ConversationNotFound(id))?;
        self.export_conversation(&conversation, categories, format)
            .await
    }

    /// Exports a conversation the caller already holds.
    pub async fn export_conversation(
        &self,
        conversation: &Conversation,
        categories: &[String],
        format: ExportFormat,
    ) -> Result<ExportedDocument, ExportError> {
        tracing::info!(
            conversation_id = %conversation.id(),
            format = %format,
            "export started"
        );

        let result = self.render(conversation, categories, format).await;
        if let Err(err) = &result {
            tracing::warn!(
                conversation_id = %conversation.id(),
                format = %format,
                error = %err,
                "export failed"
            );
        }
        result
    }

    /// Produces the canonical notes document without encoding it.
    pub async fn notes(
        &self,
        conversation: &Conversation,
        categories: &[String],
    ) -> Result<NotesDocument, ExportError> {
        let transcript = Transcript::from_conversation(conversation, &self.catalog);
        if transcript.is_empty() {
            return Err(ExportError::EmptyConversation);
        }

        let categories = resolve_categories(categories);
        tracing::debug!(
            conversation_id = %conversation.id(),
            lines = transcript.line_count(),
            categories = categories.len(),
            "requesting analysis"
        );
        let analysis = self
            .summarizer
            .summarize(SummaryRequest::new(transcript.as_str(), categories))
            .await?;

        Ok(NotesDocument {
            title: conversation.title().to_string(),
            analysis,
            participants: conversation
                .participants()
                .iter()
                .map(|id| self.catalog.display_name(id))
                .collect(),
            generated_at: Timestamp::now(),
            attribution: self.summarizer.attribution(),
        })
    }

    async fn render(
        &self,
        conversation: &Conversation,
        categories: &[String],
        format: ExportFormat,
    ) -> Result<ExportedDocument, ExportError> {
        let notes = self.notes(conversation, categories).await?;

        let content = match format {
            ExportFormat::Markdown => notes.to_markdown().into_bytes(),
            ExportFormat::Word => notes.to_word_html().into_bytes(),
            ExportFormat::Pdf => self.pdf_renderer.render(&notes.to_pdf_html()).await?,
        };

        Ok(ExportedDocument::new(content, format, &notes.title))
    }
}
