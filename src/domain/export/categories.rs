//! Analysis categories and the summarization prompt built from them.
//!
//! Each category label is paired with extraction guidance chosen by keyword.
//! The rules are checked top to bottom and the first match wins; labels that
//! match nothing get [`DEFAULT_GUIDANCE`].

/// Categories used when the caller supplies none, in template order.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Core Insights (Bullet Points)",
    "Key Questions Raised",
    "Proposed Solutions or Ideas",
    "Actionable Recommendations",
    "Important Disagreements",
    "Referenced People/Concepts/Tools",
    "Noteworthy Quotes (Optional)",
    "Open Threads / Follow-ups",
];

/// Guidance for labels no rule recognizes.
pub const DEFAULT_GUIDANCE: &str =
    "• Extract relevant information for this category based on the conversation";

const PROMPT_PREAMBLE: &str = "Extract from this chat the key ideas, deep insights, debates, and questions raised. Summarize with minimal fluff, structured by insight category. Identify original thoughts, strong disagreements, useful frameworks/tools mentioned, and actionable takeaways. Return results in bullet format, using the provided template.";

/// A guidance rule: any keyword found in the lower-cased label selects it.
struct GuidanceRule {
    keywords: &'static [&'static str],
    guidance: &'static str,
}

impl GuidanceRule {
    fn matches(&self, label_lower: &str) -> bool {
        self.keywords.iter().any(|k| label_lower.contains(k))
    }
}

const GUIDANCE_RULES: [GuidanceRule; 8] = [
    GuidanceRule {
        keywords: &["insight", "core"],
        guidance: "• Summarize key arguments, takeaways, or novel ideas\n\t• Prioritize deep, original, or contrarian thoughts\n\t• Strip away filler, focus on what's intellectually valuable",
    },
    GuidanceRule {
        keywords: &["question"],
        guidance: "• List the high-quality questions asked (especially open-ended or challenging ones)\n\t• Include who asked, if applicable",
    },
    GuidanceRule {
        keywords: &["solution", "idea"],
        guidance: "• Extract solutions proposed to problems\n\t• Include approaches, frameworks, tools, or mental models discussed",
    },
    GuidanceRule {
        keywords: &["recommendation", "action"],
        guidance: "• Convert abstract ideas into steps or strategic directions\n\t• Identify what someone could do based on this conversation",
    },
    GuidanceRule {
        keywords: &["disagreement", "debate"],
        guidance: "• Identify areas of debate or dissent\n\t• Clearly state both/all sides with reasoning",
    },
    GuidanceRule {
        keywords: &["reference", "people", "concept", "tool"],
        guidance: "• Extract any referenced:\n\t• Thinkers (e.g., Taleb, Turing)\n\t• Frameworks (e.g., OODA loop, first principles)\n\t• Technologies/tools (e.g., LangChain, DALL·E, CUDA)\n\t• Papers or books",
    },
    GuidanceRule {
        keywords: &["quote"],
        guidance: "• Pick up 2–3 sentences that are extremely insightful, tweetable, or intellectually potent",
    },
    GuidanceRule {
        keywords: &["thread", "follow"],
        guidance: "• What wasn't resolved?\n\t• Which points require further research or decisions?",
    },
];

/// Returns the caller's categories, or the defaults when none are usable.
///
/// Labels are trimmed and blank labels dropped.
pub fn resolve_categories(requested: &[String]) -> Vec<String> {
    let cleaned: Vec<String> = requested
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if cleaned.is_empty() {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    } else {
        cleaned
    }
}

/// Extraction guidance for a category label.
pub fn guidance_for(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    GUIDANCE_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.guidance)
        .unwrap_or(DEFAULT_GUIDANCE)
}

/// Numbered template: `"1. Label\n\tguidance"` blocks separated by blank lines.
pub fn category_template(categories: &[String]) -> String {
    categories
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {}\n\t{}", i + 1, label, guidance_for(label)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Full summarization prompt for a transcript.
pub fn summarization_prompt(transcript: &str, categories: &[String]) -> String {
    format!(
        "{}\n\nCONVERSATION:\n{}\n\nPlease format your response using this template:\n\n{}",
        PROMPT_PREAMBLE,
        transcript,
        category_template(categories)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_request_uses_eight_defaults_in_order() {
        let resolved = resolve_categories(&[]);
        assert_eq!(resolved.len(), 8);
        assert_eq!(resolved[0], "Core Insights (Bullet Points)");
        assert_eq!(resolved[7], "Open Threads / Follow-ups");
    }

    #[test]
    fn blank_labels_fall_back_to_defaults() {
        let resolved = resolve_categories(&labels(&["  ", ""]));
        assert_eq!(resolved.len(), 8);
    }

    #[test]
    fn custom_labels_are_trimmed_and_kept() {
        let resolved = resolve_categories(&labels(&[" Physics ", "", "Quotes"]));
        assert_eq!(resolved, labels(&["Physics", "Quotes"]));
    }

    #[test]
    fn guidance_matches_keywords_case_insensitively() {
        assert!(guidance_for("KEY QUESTIONS").starts_with("• List the high-quality questions"));
        assert!(guidance_for("Best quotes").starts_with("• Pick up 2–3 sentences"));
        assert!(guidance_for("Follow-up items").starts_with("• What wasn't resolved?"));
    }

    #[test]
    fn first_matching_rule_wins() {
        // "Core questions" matches both the insight and question rules.
        assert!(guidance_for("Core questions").starts_with("• Summarize key arguments"));
    }

    #[test]
    fn unrecognized_label_gets_default_guidance() {
        assert_eq!(guidance_for("Weather"), DEFAULT_GUIDANCE);
    }

    #[test]
    fn template_numbers_categories() {
        let template = category_template(&labels(&["Key Questions", "Weather"]));
        assert_eq!(
            template,
            format!(
                "1. Key Questions\n\t{}\n\n2. Weather\n\t{}",
                guidance_for("Key Questions"),
                DEFAULT_GUIDANCE
            )
        );
    }

    #[test]
    fn prompt_embeds_transcript_and_template() {
        let prompt = summarization_prompt("USER: Hi", &labels(&["Weather"]));
        assert!(prompt.starts_with("Extract from this chat"));
        assert!(prompt.contains("\n\nCONVERSATION:\nUSER: Hi\n\n"));
        assert!(prompt.ends_with(&format!("1. Weather\n\t{}", DEFAULT_GUIDANCE)));
    }
}
