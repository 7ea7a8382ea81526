//! Detection runner that orchestrates all checks.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::analysis::ParsedUnit;
use crate::config::Thresholds;

use super::{
    detect_bare_excepts, detect_complex_functions, detect_missing_docstrings,
    detect_missing_main_guard, detect_repeated_literals, detect_syntax_errors,
    detect_undefined_names, detect_unused_imports, detect_unused_variables, syntax_error_issue,
    Issue, IssueKind,
};

/// Run one check, turning an error or panic into zero issues.
fn run_check<F>(rule: &str, check: F) -> Vec<Issue>
where
    F: FnOnce() -> anyhow::Result<Vec<Issue>>,
{
    match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(Ok(issues)) => issues,
        Ok(Err(e)) => {
            warn!(rule, error = %e, "detection rule failed");
            Vec::new()
        }
        Err(_) => {
            warn!(rule, "detection rule panicked");
            Vec::new()
        }
    }
}

/// Executes the fixed battery of checks against a parsed file.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    thresholds: Thresholds,
}

impl Detector {
    /// Create a detector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size limits used by the function and literal checks.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run every check and return issues in check order.
    ///
    /// A unit without a tree yields a single syntax error issue.
    pub fn detect(&self, unit: &ParsedUnit) -> Vec<Issue> {
        let tree = match &unit.tree {
            Some(tree) => tree,
            None if unit.parse_failed => {
                return vec![syntax_error_issue(unit.parse_error.as_ref())];
            }
            None => {
                return vec![Issue::new(
                    IssueKind::SyntaxError,
                    1,
                    "The file contains syntax errors and could not be fully analyzed.",
                    "Fix the syntax errors to enable complete analysis.",
                )];
            }
        };
        let thresholds = &self.thresholds;

        let mut issues = Vec::new();

        // Re-parse in case the unit and the source disagree
        issues.extend(run_check("syntax_error", || detect_syntax_errors(unit)));

        // Name binding versus usage
        issues.extend(run_check("undefined_variable", || {
            detect_undefined_names(unit, tree)
        }));
        issues.extend(run_check("unused_import", || detect_unused_imports(unit, tree)));
        issues.extend(run_check("unused_variable", || {
            detect_unused_variables(unit, tree)
        }));

        // Declaration shape
        issues.extend(run_check("complex_function", || {
            detect_complex_functions(unit, thresholds)
        }));
        issues.extend(run_check("missing_docstring", || {
            detect_missing_docstrings(unit)
        }));

        issues.extend(run_check("bare_exception", || detect_bare_excepts(unit, tree)));
        issues.extend(run_check("repeated_value", || {
            detect_repeated_literals(unit, tree, thresholds)
        }));
        issues.extend(run_check("main_guard", || {
            detect_missing_main_guard(unit, tree)
        }));

        debug!(path = %unit.path, count = issues.len(), "detection finished");
        issues
    }
}
