//! Post-processing of model replies before they are shown to a user.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const THINKING_INDICATORS: &[&str] = &["thinking:", "thinking about", "<thinking>", "[thinking]"];

/// Each pattern captures the answer that follows a reasoning preamble.
static THINKING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let patterns = [
        r"(?is).*?thinking:.*?\n\n(.*)",
        r"(?is).*?thinking about.*?\n\n(.*)",
        r"(?is).*?<thinking>.*?</thinking>(.*)",
        r"(?is).*?\[thinking\].*?\[/thinking\](.*)",
        r"(?is).*?I'll think through.*?\n\n(.*)",
        r"(?is).*?Let me analyze.*?\n\n(.*)",
        r"(?is).*?Let's analyze.*?\n\n(.*)",
    ];
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
});

/// Drop the model's visible reasoning and keep its answer.
///
/// Text without a thinking indicator is returned unchanged. When an
/// indicator is present but no pattern matches, the last non-empty
/// paragraph is used.
pub fn filter_thinking(text: &str) -> String {
    let lowered = text.to_lowercase();
    if !THINKING_INDICATORS.iter().any(|i| lowered.contains(i)) {
        return text.to_string();
    }

    for pattern in THINKING_PATTERNS.iter() {
        if let Some(answer) = pattern.captures(text).and_then(|caps| caps.get(1)) {
            debug!("Filtered thinking output from response");
            return answer.as_str().trim().to_string();
        }
    }

    if text.contains("\n\n") {
        if let Some(paragraph) = text.rsplit("\n\n").find(|p| !p.trim().is_empty()) {
            return paragraph.trim().to_string();
        }
    }

    text.to_string()
}
