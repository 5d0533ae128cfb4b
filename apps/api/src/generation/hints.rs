//! Friendly titles and help text for generation errors.
//!
//! Errors reach the client as one message string. The first entry whose
//! pattern appears in that message (case-insensitive) wins.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorHint {
    pub title: &'static str,
    pub message: String,
    pub help: &'static str,
}

struct HintRule {
    patterns: &'static [&'static str],
    title: &'static str,
    message: &'static str,
    help: &'static str,
}

const RULES: &[HintRule] = &[
    HintRule {
        patterns: &["api key not configured"],
        title: "API Key Missing",
        message: "Please configure your API key in Settings before generating emails.",
        help: "Open Settings to add your API key.",
    },
    HintRule {
        patterns: &["invalid provider"],
        title: "Invalid Provider",
        message: "The selected LLM provider is not valid. Please select a valid provider in Settings.",
        help: "Open Settings to configure your provider.",
    },
    HintRule {
        patterns: &["failed to scrape"],
        title: "Page Read Error",
        message: "Unable to read the content of this page. Restricted or internal browser pages cannot be read.",
        help: "Try a regular webpage such as a LinkedIn profile, job posting or company page.",
    },
    HintRule {
        patterns: &["rate limit", "[429]", "too many requests"],
        title: "Rate Limited",
        message: "You've made too many requests. Please wait a moment before trying again.",
        help: "Wait 30-60 seconds and try again, or consider upgrading your API plan.",
    },
    HintRule {
        patterns: &["quota"],
        title: "API Quota Exceeded",
        message: "Your API quota has been exhausted for this billing period.",
        help: "Check your API provider dashboard for quota details and billing options.",
    },
    HintRule {
        patterns: &["unauthorized", "[401]", "invalid api key", "incorrect api key"],
        title: "Authentication Failed",
        message: "Your API key appears to be invalid or expired.",
        help: "Open Settings to update your API key.",
    },
    HintRule {
        patterns: &["network"],
        title: "Connection Error",
        message: "Unable to connect to the AI service. Check your internet connection.",
        help: "Make sure you're connected to the internet and try again.",
    },
];

const FALLBACK_TITLE: &str = "Something Went Wrong";
const FALLBACK_HELP: &str = "If this persists, try refreshing the page or checking your settings.";

pub fn hint_for(error_message: &str) -> ErrorHint {
    let lower = error_message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lower.contains(p)))
        .map(|rule| ErrorHint {
            title: rule.title,
            message: rule.message.to_string(),
            help: rule.help,
        })
        .unwrap_or_else(|| ErrorHint {
            title: FALLBACK_TITLE,
            message: error_message.to_string(),
            help: FALLBACK_HELP,
        })
}
