//! Function-shape and documentation checks.

use crate::analysis::ParsedUnit;
use crate::config::Thresholds;

use super::{Issue, IssueKind};

/// Functions that are too long or take too many parameters.
///
/// Both issues may fire for the same function; each is anchored at its
/// start line.
pub fn detect_complex_functions(
    unit: &ParsedUnit,
    thresholds: &Thresholds,
) -> anyhow::Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for func in unit.functions() {
        let length = func.length();
        if length > thresholds.max_function_lines {
            issues.push(Issue::new(
                IssueKind::ComplexFunction,
                func.start_line,
                format!("Function '{}' is very long ({} lines).", func.name, length),
                "Consider breaking this function into smaller, more focused functions.",
            ));
        }

        let count = func.parameters.len();
        if count > thresholds.max_parameters {
            issues.push(Issue::new(
                IssueKind::TooManyArguments,
                func.start_line,
                format!(
                    "Function '{}' has {} parameters, which might be too many.",
                    func.name, count
                ),
                "Consider grouping related parameters into a class or dictionary.",
            ));
        }
    }

    Ok(issues)
}

/// Public functions and all classes without a docstring.
pub fn detect_missing_docstrings(unit: &ParsedUnit) -> anyhow::Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for func in unit.functions() {
        if func.docstring.is_none() && !func.name.starts_with('_') {
            issues.push(Issue::new(
                IssueKind::MissingDocstring,
                func.start_line,
                format!("Function '{}' lacks a docstring.", func.name),
                "Add a descriptive docstring to document the function's purpose and usage.",
            ));
        }
    }

    for class in unit.classes() {
        if class.docstring.is_none() {
            issues.push(Issue::new(
                IssueKind::MissingDocstring,
                class.start_line,
                format!("Class '{}' lacks a docstring.", class.name),
                "Add a descriptive docstring to document the class's purpose and usage.",
            ));
        }
    }

    Ok(issues)
}
