//! Line-level checks for files that failed to parse.
//!
//! These are heuristics over raw text, shown in the basic report to help
//! locate the syntax problem.

use serde::{Deserialize, Serialize};

const BLOCK_KEYWORDS: &[&str] = &[
    "def ", "class ", "if ", "else", "elif ", "for ", "while ", "try", "except ", "finally",
];

/// Results of the basic line checks. Line numbers are 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicChecks {
    /// Some line contains a tab and some line contains four spaces.
    pub mixed_indentation: bool,
    pub missing_colons: Vec<usize>,
    pub unclosed_parentheses: Vec<usize>,
    pub unclosed_quotes: Vec<usize>,
}

impl BasicChecks {
    pub fn is_clean(&self) -> bool {
        !self.mixed_indentation
            && self.missing_colons.is_empty()
            && self.unclosed_parentheses.is_empty()
            && self.unclosed_quotes.is_empty()
    }
}

/// Run the basic checks over source lines.
pub fn basic_checks(lines: &[String]) -> BasicChecks {
    let has_tabs = lines.iter().any(|l| l.contains('\t'));
    let has_spaces = lines.iter().any(|l| l.contains("    "));

    let mut checks = BasicChecks {
        mixed_indentation: has_tabs && has_spaces,
        ..Default::default()
    };

    let mut open_parens: i64 = 0;

    for (i, line) in lines.iter().enumerate() {
        let number = i + 1;
        let stripped = line.trim();

        if BLOCK_KEYWORDS.iter().any(|k| stripped.starts_with(k)) && !stripped.ends_with(':') {
            checks.missing_colons.push(number);
        }

        let mut in_single = false;
        let mut in_double = false;
        for c in line.chars() {
            match c {
                '(' if !in_single && !in_double => open_parens += 1,
                ')' if !in_single && !in_double => {
                    open_parens -= 1;
                    if open_parens < 0 {
                        checks.unclosed_parentheses.push(number);
                        open_parens = 0;
                    }
                }
                '\'' if !in_double => in_single = !in_single,
                '"' if !in_single => in_double = !in_double,
                _ => {}
            }
        }

        if in_single || in_double {
            checks.unclosed_quotes.push(number);
        }
    }

    if open_parens > 0 {
        checks.unclosed_parentheses.push(lines.len());
    }

    checks
}

/// Render at most five line numbers, with `...` when there are more.
pub fn format_line_list(lines: &[usize]) -> String {
    let shown: Vec<String> = lines.iter().take(5).map(|n| n.to_string()).collect();
    let mut out = shown.join(", ");
    if lines.len() > 5 {
        out.push_str("...");
    }
    out
}
