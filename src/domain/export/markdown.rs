//! Markdown-to-plain-text normalization for printable exports.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered rewrite rules: (pattern, replacement).
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Code fences first so their bodies are not treated as markup.
        (r"(?s)```.*?```", ""),
        (r"(?m)^#{1,6}[ \t]+", ""),
        (r"(?m)^[ \t]*[*+-][ \t]+", "• "),
        (r"\*\*(.*?)\*\*", "$1"),
        (r"__(.*?)__", "$1"),
        (r"\*(.*?)\*", "$1"),
        (r"_(.*?)_", "$1"),
        (r"`([^`]+)`", "$1"),
        (r"\[([^\]]+)\]\([^)]+\)", "$1"),
        (r"\n{3,}", "\n\n"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Strips markdown syntax from `markdown`.
///
/// Headers, bold and italic markers, code fences and inline code, and link
/// syntax are removed; list bullets become `• `. The rules are re-applied
/// until the text stops changing, so stripping already-stripped text is a
/// no-op.
pub fn strip_markdown(markdown: &str) -> String {
    let mut current = strip_once(markdown);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(text: &str) -> String {
    let stripped = RULES.iter().fold(text.to_string(), |acc, (re, replacement)| {
        re.replace_all(&acc, *replacement).into_owned()
    });
    stripped.trim().to_string()
}
