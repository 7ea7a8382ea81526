//! Prompt construction and response parsing.

/// Marker that ends the prompt; the analysis follows its last occurrence.
pub const ANALYSIS_MARKER: &str = "Analysis:";

const MAX_SNIPPET_CHARS: usize = 500;
const MAX_SUGGESTIONS: usize = 3;
const HEDGING_WORDS: &[&str] = &["should", "could", "consider"];

/// Build the analysis prompt for a code snippet.
pub fn build_prompt(snippet: &str) -> String {
    let code: String = snippet.chars().take(MAX_SNIPPET_CHARS).collect();
    format!(
        "Analyze this Python code and identify issues, improvements, or bugs:\n\n```python\n{}\n```\n\n{}\n",
        code, ANALYSIS_MARKER
    )
}

/// The analysis text: everything after the last marker, trimmed.
pub fn analysis_section(generated: &str) -> &str {
    generated
        .rsplit(ANALYSIS_MARKER)
        .next()
        .unwrap_or(generated)
        .trim()
}

/// Pick suggestion lines out of an analysis.
///
/// Bulleted lines (`-` or `*`) lose their marker; lines using hedging words
/// are kept whole. At most three are returned.
pub fn extract_suggestions(analysis: &str) -> Vec<String> {
    analysis
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
                Some(rest.trim().to_string())
            } else if HEDGING_WORDS.iter().any(|w| line.contains(w)) {
                Some(line.to_string())
            } else {
                None
            }
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}
