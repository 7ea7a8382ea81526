//! Improvement suggestions for parsed Python files.
//!
//! Suggestions come from, in order: structural rules, best-practice rules,
//! documentation rules, the kinds of detected issues, and finally the
//! optional text-generation model. Files that failed to parse only get the
//! syntax-error remedies.

mod issues;
mod rules;
mod syntax;

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::ParsedUnit;
use crate::config::Config;
use crate::detect::Issue;
use crate::model::ModelAdapter;

pub use issues::suggest_from_issues;
pub use rules::{
    has_type_hints, suggest_best_practices, suggest_documentation, suggest_structure,
};
pub use syntax::syntax_error_suggestions;

/// Characters of source sent to the model.
const MODEL_SNIPPET_CHARS: usize = 1000;

/// One improvement recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    /// Illustrative snippet, not validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_code: Option<String>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            example_code: None,
        }
    }

    pub fn with_example(mut self, code: impl Into<String>) -> Self {
        self.example_code = Some(code.into());
        self
    }
}

/// Generates suggestions, optionally consulting a model.
pub struct Suggester {
    adapter: ModelAdapter,
}

impl Suggester {
    /// Build a suggester whose model settings come from `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_adapter(ModelAdapter::from_config(&config.model))
    }

    /// Build a suggester around an existing model adapter.
    pub fn with_adapter(adapter: ModelAdapter) -> Self {
        Self { adapter }
    }

    /// A suggester that never consults a model.
    pub fn without_model() -> Self {
        Self::with_adapter(ModelAdapter::unavailable())
    }

    pub fn adapter(&self) -> &ModelAdapter {
        &self.adapter
    }

    /// Produce suggestions for a unit and its detected issues.
    pub fn suggest(&self, unit: &ParsedUnit, issues: &[Issue]) -> Vec<Suggestion> {
        if unit.parse_failed && !unit.has_tree() {
            let message = unit
                .parse_error
                .as_ref()
                .map(|e| e.message.as_str())
                .unwrap_or("Unknown syntax error");
            return syntax_error_suggestions(message);
        }

        let mut suggestions = Vec::new();
        suggestions.extend(suggest_structure(unit));
        suggestions.extend(suggest_best_practices(unit));
        suggestions.extend(suggest_documentation(unit));
        suggestions.extend(suggest_from_issues(issues));

        if !unit.parse_failed {
            suggestions.extend(self.model_suggestions(unit));
        }

        debug!(path = %unit.path, count = suggestions.len(), "suggestions generated");
        suggestions
    }

    /// Model output wrapped as suggestions; any failure yields none.
    fn model_suggestions(&self, unit: &ParsedUnit) -> Vec<Suggestion> {
        let snippet: String = unit.code.chars().take(MODEL_SNIPPET_CHARS).collect();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.adapter.analyze(&snippet)));

        match result {
            Ok(analysis) => analysis
                .suggestions
                .into_iter()
                .map(|text| Suggestion::new(text.clone(), text))
                .collect(),
            Err(_) => {
                warn!("model analysis panicked, skipping model suggestions");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract_source;
    use crate::detect::Detector;
    use crate::model::{GenerationParams, ModelError, TextGenerator};

    struct Fixed;

    impl TextGenerator for Fixed {
        fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, ModelError> {
            Ok("Analysis:\n- Use pathlib".to_string())
        }
    }

    fn titles(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_parse_failure_gets_only_syntax_remedies() {
        let unit = extract_source("bad.py", "def f():\nreturn 1\n");
        let issues = Detector::new().detect(&unit);
        let suggestions = Suggester::without_model().suggest(&unit, &issues);
        assert_eq!(
            titles(&suggestions),
            vec![
                "Add proper indentation after block statements",
                "Use a linter to catch syntax errors",
            ]
        );
    }

    #[test]
    fn test_declaration_free_file_gets_no_structural_suggestions() {
        let unit = extract_source("plain.py", "x = 2\nprint(x)\n");
        let issues = Detector::new().detect(&unit);
        let suggestions = Suggester::without_model().suggest(&unit, &issues);
        let titles = titles(&suggestions);
        assert!(!titles.contains(&"Consider organizing functions into classes"));
        assert!(!titles.contains(&"Add a main function with proper entry point"));
        // only the unavailable-model fallback remains
        assert_eq!(suggestions.len(), 3);
        assert_eq!(
            suggestions[0].title,
            "Consider adding comments to explain complex logic"
        );
        assert_eq!(suggestions[0].title, suggestions[0].description);
    }

    #[test]
    fn test_model_suggestions_come_last() {
        let unit = extract_source("t.py", "def run():\n    pass\n");
        let issues = Detector::new().detect(&unit);
        let adapter = ModelAdapter::with_loader(|| Ok(Box::new(Fixed) as Box<dyn TextGenerator>), None);
        let suggestions = Suggester::with_adapter(adapter).suggest(&unit, &issues);

        let last = suggestions.last().unwrap();
        assert_eq!(last.title, "Use pathlib");
        assert_eq!(last.description, "Use pathlib");
        assert_eq!(last.example_code, None);
        assert_eq!(suggestions[0].title, "Add a main function with proper entry point");
    }

    #[test]
    fn test_suggest_is_idempotent() {
        let unit = extract_source("t.py", "import os\n\ndef a():\n    pass\n\ndef b():\n    pass\n\ndef c():\n    pass\n");
        let issues = Detector::new().detect(&unit);
        let suggester = Suggester::without_model();
        assert_eq!(suggester.suggest(&unit, &issues), suggester.suggest(&unit, &issues));
    }
}
