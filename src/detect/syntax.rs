//! Syntax error issues.

use crate::analysis::{syntax, ParseError, ParsedUnit};

use super::{Issue, IssueKind};

const FIX_SYNTAX: &str = "Fix the syntax error to make the code valid.";

/// Issue describing a parse failure.
pub fn syntax_error_issue(error: Option<&ParseError>) -> Issue {
    let (line, message) = match error {
        Some(e) => (e.line.unwrap_or(1), e.message.as_str()),
        None => (1, "Unknown syntax error"),
    };
    Issue::new(
        IssueKind::SyntaxError,
        line,
        format!("Syntax error: {}", message),
        FIX_SYNTAX,
    )
}

/// Re-parse the source and report a failure the extractor did not see.
pub fn detect_syntax_errors(unit: &ParsedUnit) -> anyhow::Result<Vec<Issue>> {
    match syntax::parse(&unit.code) {
        Ok(_) => Ok(Vec::new()),
        Err(error) => Ok(vec![syntax_error_issue(Some(&error))]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_issue_defaults() {
        let issue = syntax_error_issue(None);
        assert_eq!(issue.line, 1);
        assert_eq!(issue.message, "Syntax error: Unknown syntax error");

        let error = ParseError::at(7, 3, "unexpected indent");
        let issue = syntax_error_issue(Some(&error));
        assert_eq!(issue.line, 7);
        assert_eq!(issue.message, "Syntax error: unexpected indent");
        assert_eq!(issue.suggestion, FIX_SYNTAX);
    }

    #[test]
    fn test_recheck_passes_on_valid_code() {
        let unit = crate::analysis::extract_source("t.py", "x = 1\n");
        assert!(detect_syntax_errors(&unit).unwrap().is_empty());
    }
}
