//! Feed content derived from generation responses.

use std::sync::OnceLock;

use regex::Regex;

/// Most snippets taken from one response.
pub const MAX_SNIPPETS: usize = 4;

// Shorter sentences are usually headings or list markers.
const MIN_SNIPPET_CHARS: usize = 12;
const MAX_SNIPPET_CHARS: usize = 140;

fn sentence_end() -> &'static Regex {
    static SENTENCE_END: OnceLock<Regex> = OnceLock::new();
    SENTENCE_END.get_or_init(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence regex"))
}

/// Splits `raw` on sentence boundaries and keeps the first `limit`
/// non-trivial sentences.
///
/// A boundary is terminal punctuation followed by whitespace or the end of the
/// text, so decimals like `3.5` stay inside their sentence. Whitespace is
/// collapsed and markdown list/heading markers are stripped.
///
/// ```rust
/// use keystone_core::feed::extract_snippets;
///
/// let raw = "Scope covers 3.5 km of road. Ok. Drainage work starts in May!";
/// assert_eq!(
///     extract_snippets(raw, 4),
///     ["Scope covers 3.5 km of road.", "Drainage work starts in May!"]
/// );
/// ```
pub fn extract_snippets(raw: &str, limit: usize) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in sentence_end().find_iter(raw) {
        sentences.push(&raw[start..boundary.end()]);
        start = boundary.end();
    }
    if start < raw.len() {
        sentences.push(&raw[start..]);
    }

    sentences
        .into_iter()
        .map(normalize)
        .filter(|sentence| sentence.chars().count() >= MIN_SNIPPET_CHARS)
        .take(limit)
        .collect()
}

fn normalize(sentence: &str) -> String {
    let collapsed = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = collapsed.trim_start_matches(|c: char| matches!(c, '#' | '*' | '-' | '>' | ' '));

    if stripped.chars().count() > MAX_SNIPPET_CHARS {
        let truncated: String = stripped.chars().take(MAX_SNIPPET_CHARS - 1).collect();
        format!("{}…", truncated.trim_end())
    } else {
        stripped.to_string()
    }
}

/// Lines shown after a brief when the response yields no snippets.
pub fn brief_fallback() -> Vec<String> {
    vec![
        "Reading through the document...".to_string(),
        "Drafting the project brief...".to_string(),
    ]
}

/// Lines shown after a task set when neither a thinking log nor snippets exist.
pub fn tasks_fallback(project_name: &str) -> Vec<String> {
    vec![
        format!("Reviewing the scope for {project_name}..."),
        "Breaking the work into tasks...".to_string(),
    ]
}
