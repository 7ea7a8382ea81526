//! Core types for detection results.

use serde::{Deserialize, Serialize};

/// Closed set of issue kinds, in the order the detector runs its checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "syntax_error")]
    SyntaxError,
    #[serde(rename = "potential_undefined_variable")]
    PotentialUndefinedVariable,
    #[serde(rename = "unused_import")]
    UnusedImport,
    #[serde(rename = "unused_variable")]
    UnusedVariable,
    #[serde(rename = "complex_function")]
    ComplexFunction,
    #[serde(rename = "too_many_arguments")]
    TooManyArguments,
    #[serde(rename = "missing_docstring")]
    MissingDocstring,
    #[serde(rename = "bare_exception")]
    BareException,
    #[serde(rename = "repeated_hardcoded_value")]
    RepeatedHardcodedValue,
    #[serde(rename = "missing_main_guard")]
    MissingMainGuard,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SyntaxError => "syntax_error",
            IssueKind::PotentialUndefinedVariable => "potential_undefined_variable",
            IssueKind::UnusedImport => "unused_import",
            IssueKind::UnusedVariable => "unused_variable",
            IssueKind::ComplexFunction => "complex_function",
            IssueKind::TooManyArguments => "too_many_arguments",
            IssueKind::MissingDocstring => "missing_docstring",
            IssueKind::BareException => "bare_exception",
            IssueKind::RepeatedHardcodedValue => "repeated_hardcoded_value",
            IssueKind::MissingMainGuard => "missing_main_guard",
        }
    }

    /// Title-cased name used in console reports.
    pub fn title(&self) -> &'static str {
        match self {
            IssueKind::SyntaxError => "Syntax Error",
            IssueKind::PotentialUndefinedVariable => "Potential Undefined Variable",
            IssueKind::UnusedImport => "Unused Import",
            IssueKind::UnusedVariable => "Unused Variable",
            IssueKind::ComplexFunction => "Complex Function",
            IssueKind::TooManyArguments => "Too Many Arguments",
            IssueKind::MissingDocstring => "Missing Docstring",
            IssueKind::BareException => "Bare Exception",
            IssueKind::RepeatedHardcodedValue => "Repeated Hardcoded Value",
            IssueKind::MissingMainGuard => "Missing Main Guard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "syntax_error" => Some(IssueKind::SyntaxError),
            "potential_undefined_variable" => Some(IssueKind::PotentialUndefinedVariable),
            "unused_import" => Some(IssueKind::UnusedImport),
            "unused_variable" => Some(IssueKind::UnusedVariable),
            "complex_function" => Some(IssueKind::ComplexFunction),
            "too_many_arguments" => Some(IssueKind::TooManyArguments),
            "missing_docstring" => Some(IssueKind::MissingDocstring),
            "bare_exception" => Some(IssueKind::BareException),
            "repeated_hardcoded_value" => Some(IssueKind::RepeatedHardcodedValue),
            "missing_main_guard" => Some(IssueKind::MissingMainGuard),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// A single detected problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// 1-indexed line the issue is anchored to.
    pub line: usize,
    pub message: String,
    /// Short remediation hint, may be empty.
    pub suggestion: String,
    /// Extra detail shown in verbose output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        line: usize,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
            suggestion: suggestion.into(),
            context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            IssueKind::SyntaxError,
            IssueKind::UnusedImport,
            IssueKind::TooManyArguments,
            IssueKind::MissingMainGuard,
        ] {
            assert_eq!(IssueKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(IssueKind::parse("nope"), None);
    }

    #[test]
    fn test_issue_serializes_without_empty_context() {
        let issue = Issue::new(IssueKind::BareException, 3, "msg", "fix");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"kind\":\"bare_exception\""));
        assert!(!json.contains("context"));
        assert_eq!(IssueKind::BareException.to_string(), "Bare Exception");
    }
}
