//! The refined-notes document and its renderings.
//!
//! A [`NotesDocument`] wraps the categorized analysis returned by the
//! summarizer with a header (title, attribution) and a footer (generation
//! date, participants, model). It renders to markdown directly, and to a
//! plain-text form that feeds the PDF and word-processor HTML layouts.

use super::format::ExportFormat;
use super::markdown::strip_markdown;
use crate::domain::foundation::Timestamp;

const FILENAME_SUFFIX: &str = "_refined_notes";
const PLAIN_HEADER_PREFIX: &str = "CONVERSATION ANALYSIS:";
const FONT_STACK: &str = "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif";

/// Summarizer that produced an analysis, for the attribution lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Service name, e.g. "Cerebras".
    pub provider: String,
    /// Model identifier, e.g. "llama3.1-8b".
    pub model: String,
}

impl Attribution {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// Canonical refined-notes document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesDocument {
    pub title: String,
    /// Categorized analysis text, markdown as returned by the summarizer.
    pub analysis: String,
    /// Full display names of the conversation's participants.
    pub participants: Vec<String>,
    pub generated_at: Timestamp,
    pub attribution: Attribution,
}

impl NotesDocument {
    /// Markdown rendering, syntax preserved.
    pub fn to_markdown(&self) -> String {
        format!(
            "# Conversation Analysis: {}\n*{}*\n\n{}\n\n---\n*{}*\n*{}*\n*{}*",
            self.title,
            self.powered_by_line(),
            self.analysis,
            self.generated_line(),
            self.participants_line(),
            self.analyzed_line(),
        )
    }

    /// Plain-text rendering with markdown syntax stripped from the analysis.
    pub fn to_plain_text(&self) -> String {
        format!(
            "{} {}\n{}\n\n{}\n\n---\n{}\n{}\n{}",
            PLAIN_HEADER_PREFIX,
            self.title.to_uppercase(),
            self.powered_by_line(),
            strip_markdown(&self.analysis),
            self.generated_line(),
            self.participants_line(),
            self.analyzed_line(),
        )
    }

    /// Styled HTML laid out for PDF rendering.
    ///
    /// Numbered category lines become subheadings and bullet lines become
    /// indented paragraphs.
    pub fn to_pdf_html(&self) -> String {
        let body: String = self
            .to_plain_text()
            .lines()
            .map(pdf_block)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div style=\"font-family: {}; max-width: 800px; margin: 0 auto; padding: 20px 40px 40px 40px; background: white; color: #2d3748;\">\n{}\n</div>\n</body>\n</html>\n",
            html_escape(&self.title),
            FONT_STACK,
            body
        )
    }

    /// HTML document that word processors open as a `.doc` file.
    pub fn to_word_html(&self) -> String {
        let body: String = self
            .to_plain_text()
            .lines()
            .map(word_block)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>
<head>
<meta charset='utf-8'>
<title>Conversation Analysis</title>
<style>
body {{ font-family: {font}; line-height: 1.6; margin: 40px; color: #2d3748; background: white; }}
h1 {{ color: #1a365d; border-bottom: 2px solid #4299e1; padding-bottom: 10px; text-align: center; font-size: 24px; }}
h2 {{ color: #2d3748; margin-top: 30px; margin-bottom: 15px; font-size: 18px; }}
p {{ margin-bottom: 12px; line-height: 1.6; }}
hr {{ border: none; border-top: 1px solid #e2e8f0; margin: 20px 0; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
            font = FONT_STACK,
            body = body
        )
    }

    fn powered_by_line(&self) -> String {
        format!("Intelligent Analysis powered by {} AI", self.attribution.provider)
    }

    fn generated_line(&self) -> String {
        format!(
            "Generated from conversation on {}",
            self.generated_at.date_string()
        )
    }

    fn participants_line(&self) -> String {
        format!("Participants: {}", self.participants.join(", "))
    }

    fn analyzed_line(&self) -> String {
        format!(
            "Analyzed using {} {}",
            self.attribution.provider, self.attribution.model
        )
    }
}

/// True for lines like `"3. Open Threads"`.
fn is_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    let mut rest = line[digits..].chars();
    digits > 0 && rest.next() == Some('.') && rest.next().map_or(false, char::is_whitespace)
}

fn pdf_block(line: &str) -> String {
    let trimmed = line.trim();
    let text = html_escape(line);
    if trimmed == "---" {
        "<hr style=\"margin: 20px 0; border: none; border-top: 1px solid #ccc;\">".to_string()
    } else if trimmed.is_empty() {
        "<br>".to_string()
    } else if line.starts_with(PLAIN_HEADER_PREFIX) {
        format!(
            "<h1 style=\"color: #1a365d; font-size: 24px; margin-bottom: 10px; text-align: center;\">{}</h1>",
            text
        )
    } else if is_numbered(line) {
        format!(
            "<h2 style=\"color: #2d3748; font-size: 18px; margin-top: 25px; margin-bottom: 10px;\">{}</h2>",
            text
        )
    } else if line.starts_with('•') {
        format!(
            "<p style=\"margin-left: 20px; margin-bottom: 8px; line-height: 1.6;\">{}</p>",
            text
        )
    } else {
        format!(
            "<p style=\"margin-bottom: 12px; line-height: 1.6; color: #2d3748;\">{}</p>",
            text
        )
    }
}

fn word_block(line: &str) -> String {
    if line.trim() == "---" {
        return "<hr>".to_string();
    }
    match line.strip_prefix(PLAIN_HEADER_PREFIX) {
        Some(rest) => format!("<h1>{}</h1>", html_escape(rest.trim())),
        None => format!("{}<br>", html_escape(line)),
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Download name for a conversation's notes:
/// `<title without non-alphanumerics>_refined_notes.<ext>`.
pub fn notes_filename(title: &str, format: ExportFormat) -> String {
    let stem: String = title.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let stem = if stem.is_empty() {
        "conversation".to_string()
    } else {
        stem
    };
    format!("{}{}.{}", stem, FILENAME_SUFFIX, format.extension())
}

/// An encoded export ready to save or send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub content: Vec<u8>,
    pub content_type: String,
    pub filename: String,
    pub format: ExportFormat,
}

impl ExportedDocument {
    pub fn new(content: Vec<u8>, format: ExportFormat, title: &str) -> Self {
        Self {
            content,
            content_type: format.content_type().to_string(),
            filename: notes_filename(title, format),
            format,
        }
    }

    /// Content as UTF-8 text, for the text-based formats.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn document() -> NotesDocument {
        NotesDocument {
            title: "Discussion with Albert, Marie".to_string(),
            analysis: "## 1. Core Insights\n- **Energy** and mass are equivalent\n\n2. Key Questions\n* What is time?".to_string(),
            participants: vec!["Albert Einstein".to_string(), "Marie Curie".to_string()],
            generated_at: Timestamp::from_datetime(
                Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap(),
            ),
            attribution: Attribution::new("Cerebras", "llama3.1-8b"),
        }
    }

    #[test]
    fn markdown_has_header_analysis_and_footer() {
        let md = document().to_markdown();
        assert!(md.starts_with(
            "# Conversation Analysis: Discussion with Albert, Marie\n*Intelligent Analysis powered by Cerebras AI*\n\n## 1. Core Insights"
        ));
        assert!(md.ends_with(
            "---\n*Generated from conversation on 2024-03-14*\n*Participants: Albert Einstein, Marie Curie*\n*Analyzed using Cerebras llama3.1-8b*"
        ));
    }

    #[test]
    fn plain_text_uppercases_title_and_strips_markup() {
        let plain = document().to_plain_text();
        assert!(plain.starts_with("CONVERSATION ANALYSIS: DISCUSSION WITH ALBERT, MARIE\n"));
        assert!(plain.contains("1. Core Insights\n• Energy and mass are equivalent"));
        assert!(!plain.contains("**"));
        assert!(!plain.contains("## "));
    }

    #[test]
    fn pdf_html_maps_lines_to_blocks() {
        let html = document().to_pdf_html();
        assert!(html.contains("<h1 style=\"color: #1a365d; font-size: 24px; margin-bottom: 10px; text-align: center;\">CONVERSATION ANALYSIS: DISCUSSION WITH ALBERT, MARIE</h1>"));
        assert!(html.contains(">1. Core Insights</h2>"));
        assert!(html.contains(">2. Key Questions</h2>"));
        assert!(html.contains("<p style=\"margin-left: 20px; margin-bottom: 8px; line-height: 1.6;\">• What is time?</p>"));
        assert!(html.contains("<hr style="));
        assert!(html.contains("<br>"));
    }

    #[test]
    fn pdf_html_escapes_text() {
        let mut doc = document();
        doc.analysis = "Use <script> & friends".to_string();
        let html = doc.to_pdf_html();
        assert!(html.contains("Use &lt;script&gt; &amp; friends"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn word_html_has_office_namespaces_and_heading() {
        let html = document().to_word_html();
        assert!(html.starts_with("<html xmlns:o='urn:schemas-microsoft-com:office:office'"));
        assert!(html.contains("<meta charset='utf-8'>"));
        assert!(html.contains("<h1>DISCUSSION WITH ALBERT, MARIE</h1>"));
        assert!(html.contains("<hr>"));
        assert!(html.contains("• What is time?<br>"));
    }

    #[test]
    fn filename_strips_non_alphanumerics() {
        assert_eq!(
            notes_filename("Discussion with Albert, Marie", ExportFormat::Markdown),
            "DiscussionwithAlbertMarie_refined_notes.md"
        );
        assert_eq!(
            notes_filename("Chat with Leonardo da Vinci!", ExportFormat::Word),
            "ChatwithLeonardodaVinci_refined_notes.doc"
        );
    }

    #[test]
    fn filename_falls_back_for_symbol_only_titles() {
        assert_eq!(
            notes_filename("?!", ExportFormat::Pdf),
            "conversation_refined_notes.pdf"
        );
    }

    #[test]
    fn exported_document_carries_metadata() {
        let doc = ExportedDocument::new(b"# Notes".to_vec(), ExportFormat::Markdown, "Chat with Marie Curie");
        assert_eq!(doc.filename, "ChatwithMarieCurie_refined_notes.md");
        assert_eq!(doc.content_type, "text/markdown; charset=utf-8");
        assert_eq!(doc.as_text(), Some("# Notes"));
    }
}
