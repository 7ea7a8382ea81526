//! Output formatting for analysis results.
//!
//! Supports three outputs:
//! - Pretty: colored console report with issues and suggestions
//! - Basic: console report for files with syntax errors
//! - JSON: structured output for programmatic consumption

use std::fmt;
use std::io::Write as _;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::ParsedUnit;
use crate::detect::{basic_checks, format_line_list, BasicChecks, Issue};
use crate::error::Result;
use crate::suggest::Suggestion;
use crate::worker::AnalysisOutcome;

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn error_line(unit: &ParsedUnit) -> Option<String> {
    unit.parse_error.as_ref().map(|e| {
        let line = e
            .line
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!("  Error on line {}: {}", line, e.message)
    })
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for one analyzed file.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub description: String,
    pub parse_failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<JsonParseError>,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<Suggestion>,
    /// Present for the basic (syntax error) report only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_checks: Option<BasicChecks>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonParseError {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
}

impl JsonReport {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let unit = outcome.unit();
        let (issues, suggestions, checks) = match outcome {
            AnalysisOutcome::Basic { unit } => (Vec::new(), Vec::new(), Some(basic_checks(&unit.lines))),
            AnalysisOutcome::Full {
                issues,
                suggestions,
                ..
            } => (issues.clone(), suggestions.clone(), None),
        };

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            path: unit.path.clone(),
            description: unit.description.clone(),
            parse_failed: unit.parse_failed,
            parse_error: unit.parse_error.as_ref().map(|e| JsonParseError {
                line: e.line,
                column: e.column,
                message: e.message.clone(),
            }),
            issues,
            suggestions,
            basic_checks: checks,
        }
    }
}

/// Write an outcome as pretty-printed JSON on stdout.
pub fn write_json(outcome: &AnalysisOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from_outcome(outcome))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render the full report.
pub fn render_pretty(
    out: &mut impl fmt::Write,
    path: &str,
    unit: &ParsedUnit,
    issues: &[Issue],
    suggestions: &[Suggestion],
    verbose: bool,
) -> fmt::Result {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "{} {}", "CODE ANALYSIS REPORT:".bold(), path)?;
    writeln!(out, "{}", rule())?;

    if unit.parse_failed {
        writeln!(
            out,
            "\n{}",
            "⚠️ WARNING: This file contains syntax errors. Analysis may be incomplete.".yellow()
        )?;
        if let Some(line) = error_line(unit) {
            writeln!(out, "{}", line)?;
        }
    }

    writeln!(out, "\n{}", "📝 CODE DESCRIPTION:".bold())?;
    writeln!(out, "{}", unit.description)?;

    writeln!(out, "\n{}", "❌ ISSUES DETECTED:".bold())?;
    if issues.is_empty() {
        writeln!(out, "  {}", "No issues detected!".green())?;
    }
    for (i, issue) in issues.iter().enumerate() {
        writeln!(out, "\n  Issue #{}: {}", i + 1, issue.kind.title().red())?;
        writeln!(out, "  Line {}: {}", issue.line, issue.message)?;
        if !issue.suggestion.is_empty() {
            writeln!(out, "  Suggestion: {}", issue.suggestion)?;
        }
        if verbose {
            if let Some(context) = &issue.context {
                writeln!(out, "  Context: {}", context.dimmed())?;
            }
        }
    }

    writeln!(out, "\n{}", "✨ IMPROVEMENT SUGGESTIONS:".bold())?;
    if suggestions.is_empty() {
        writeln!(out, "  No suggestions available.")?;
    }
    for (i, suggestion) in suggestions.iter().enumerate() {
        writeln!(out, "\n  Suggestion #{}: {}", i + 1, suggestion.title.green())?;
        writeln!(out, "  Description: {}", suggestion.description)?;
        if let Some(code) = &suggestion.example_code {
            writeln!(out, "\n  Example implementation:\n")?;
            for line in code.split('\n') {
                writeln!(out, "    {}", line)?;
            }
        }
    }

    writeln!(out, "\n{}", rule())?;
    Ok(())
}

/// Render the report for a file with syntax errors.
pub fn render_basic(out: &mut impl fmt::Write, unit: &ParsedUnit) -> fmt::Result {
    writeln!(out, "\n{}", rule())?;
    writeln!(
        out,
        "{} {}",
        "BASIC ANALYSIS REPORT (SYNTAX ERRORS DETECTED):".bold(),
        unit.filename
    )?;
    writeln!(out, "{}", rule())?;

    writeln!(out, "\n{}", "📝 FILE INFORMATION:".bold())?;
    writeln!(out, "{}", unit.description)?;
    writeln!(out, "Total lines: {}", unit.lines.len())?;

    writeln!(out, "\n{}", "⚠️ SYNTAX ERROR DETAILS:".yellow().bold())?;
    if let Some(line) = error_line(unit) {
        writeln!(out, "{}", line)?;
    }
    if let Some(pointer) = error_pointer(unit) {
        out.write_str(&pointer)?;
    }

    writeln!(out, "\n{}", "🔍 BASIC CODE CHECKS:".bold())?;
    let checks = basic_checks(&unit.lines);
    if checks.mixed_indentation {
        writeln!(
            out,
            "  ⚠️ Mixed tabs and spaces detected - this can cause indentation errors"
        )?;
    }
    let listed = [
        ("Possibly missing colons", &checks.missing_colons),
        ("Possible unclosed parentheses", &checks.unclosed_parentheses),
        ("Possible unclosed quotes", &checks.unclosed_quotes),
    ];
    for (label, lines) in listed {
        if !lines.is_empty() {
            writeln!(out, "  ⚠️ {} on lines: {}", label, format_line_list(lines))?;
        }
    }

    if !unit.imports.is_empty() {
        writeln!(out, "\n{}", "📦 DETECTED IMPORTS:".bold())?;
        for (i, import) in unit.imports.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, import)?;
        }
    }

    writeln!(out, "\n{}", rule())?;
    writeln!(
        out,
        "To run a more detailed analysis despite syntax errors, use the {} flag",
        "--force".cyan()
    )?;
    writeln!(out, "{}", rule())?;
    Ok(())
}

/// The offending line and a caret under the error column.
fn error_pointer(unit: &ParsedUnit) -> Option<String> {
    let error = unit.parse_error.as_ref()?;
    let number = error.line?;
    let content = unit.line(number)?;

    let prefix = format!("  Line {}: ", number);
    let mut out = format!("\n{}{}\n", prefix, content);
    if let Some(column) = error.column.filter(|c| *c > 0) {
        let width = prefix.chars().count() + column - 1;
        out.push_str(&" ".repeat(width));
        out.push_str("^\n");
    }
    Some(out)
}

/// Print an outcome in the pretty format.
pub fn write_pretty(outcome: &AnalysisOutcome, verbose: bool) -> Result<()> {
    let mut rendered = String::new();
    match outcome {
        AnalysisOutcome::Basic { unit } => render_basic(&mut rendered, unit)?,
        AnalysisOutcome::Full {
            unit,
            issues,
            suggestions,
        } => render_pretty(&mut rendered, &unit.path, unit, issues, suggestions, verbose)?,
    }
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", rendered)?;
    Ok(())
}
