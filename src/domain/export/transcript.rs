//! Flattening a conversation into summarizer input.

use crate::domain::conversation::{Conversation, Message, Sender};
use crate::domain::persona::PersonaCatalog;

/// Chronological, system-free text rendering of a conversation.
///
/// Each line reads `SPEAKER: content`, where the speaker is `USER` or the
/// persona's display name upper-cased. Lines are separated by blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    line_count: usize,
}

impl Transcript {
    /// Builds the transcript for `conversation`.
    ///
    /// The speaker name comes from the message's persona snapshot, falling
    /// back to the catalog (and then to the persona key) for messages
    /// persisted without one.
    pub fn from_conversation(conversation: &Conversation, catalog: &PersonaCatalog) -> Self {
        let lines: Vec<String> = conversation
            .messages()
            .iter()
            .filter_map(|m| Self::line(m, catalog))
            .collect();

        Self {
            line_count: lines.len(),
            text: lines.join("\n\n"),
        }
    }

    fn line(message: &Message, catalog: &PersonaCatalog) -> Option<String> {
        let speaker = match message.sender() {
            Sender::System => return None,
            Sender::User => "USER".to_string(),
            Sender::Persona(id) => message
                .persona_ref()
                .map(|snapshot| snapshot.name.clone())
                .unwrap_or_else(|| catalog.display_name(id))
                .to_uppercase(),
        };
        Some(format!("{}: {}", speaker, message.content()))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of non-system messages included.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}
