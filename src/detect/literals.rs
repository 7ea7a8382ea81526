//! Repeated literal detection.

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

use crate::analysis::python::{node_text, preorder, start_line, string_literal};
use crate::analysis::ParsedUnit;
use crate::config::Thresholds;

use super::{Issue, IssueKind};

/// A literal constant found in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Grouping key, the value rendered as text.
    pub key: String,
    /// Rendering used in messages (strings quoted).
    pub display: String,
    pub line: usize,
}

/// Render a string value the way Python's `repr` would.
fn quote(content: &str, bytes: bool) -> String {
    let delimiter = if content.contains('\'') && !content.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(content.len() + 2);
    out.push(delimiter);
    for c in content.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() || (bytes && u32::from(c) > 0x7e) => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Render a float like Python's `str(float)`.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn parse_integer(text: &str) -> Option<i128> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .trim_end_matches(['l', 'L'])
        .to_ascii_lowercase();

    if let Some(hex) = cleaned.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = cleaned.strip_prefix("0o") {
        i128::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = cleaned.strip_prefix("0b") {
        i128::from_str_radix(bin, 2).ok()
    } else {
        cleaned.parse().ok()
    }
}

/// Numeric literal, or `None` for 0, 1 and other small magnitudes.
fn numeric_literal(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();

    if let Some(imag) = lower.strip_suffix('j') {
        let magnitude: f64 = imag.replace('_', "").parse().ok()?;
        let rendered = if magnitude.fract() == 0.0 && magnitude.abs() < 1e16 {
            format!("{}j", magnitude as i64)
        } else {
            format!("{}j", magnitude)
        };
        return Some(rendered);
    }

    let is_float = !lower.starts_with("0x")
        && (lower.contains('.') || lower.contains('e'));
    if is_float {
        let value: f64 = lower.replace('_', "").parse().ok()?;
        if value.abs() <= 1.0 {
            return None;
        }
        return Some(format_float(value));
    }

    match parse_integer(text) {
        Some(value) if value.abs() <= 1 => None,
        Some(value) => Some(value.to_string()),
        None => Some(text.replace('_', "")),
    }
}

fn literal_at(node: Node<'_>, source: &[u8]) -> Option<Literal> {
    let line = start_line(node);
    let same = |text: String| Literal {
        key: text.clone(),
        display: text,
        line,
    };

    match node.kind() {
        "integer" | "float" => numeric_literal(node_text(node, source)).map(same),
        "none" => Some(same("None".to_string())),
        "ellipsis" => Some(same("Ellipsis".to_string())),
        "string" | "concatenated_string" => {
            // parts of a concatenation are counted once as a whole
            if node.kind() == "string"
                && node
                    .parent()
                    .map(|p| p.kind() == "concatenated_string")
                    .unwrap_or(false)
            {
                return None;
            }
            let literal = string_literal(node, source)?;
            if literal.is_formatted {
                return None;
            }
            if literal.is_bytes {
                let rendered = format!("b{}", quote(&literal.content, true));
                return Some(same(rendered));
            }
            if literal.content.chars().count() <= 1 {
                return None;
            }
            Some(Literal {
                display: quote(&literal.content, false),
                key: literal.content,
                line,
            })
        }
        _ => None,
    }
}

/// All countable literals in document order.
pub fn collect_literals(tree: &Tree, source: &[u8]) -> Vec<Literal> {
    preorder(tree.root_node())
        .into_iter()
        .filter_map(|node| literal_at(node, source))
        .collect()
}

/// Literal values repeated more often than the configured limit.
pub fn detect_repeated_literals(
    unit: &ParsedUnit,
    tree: &Tree,
    thresholds: &Thresholds,
) -> anyhow::Result<Vec<Issue>> {
    let mut order: Vec<Literal> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for literal in collect_literals(tree, unit.source()) {
        let count = counts.entry(literal.key.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            order.push(literal);
        }
    }

    let mut issues = Vec::new();
    for first in order {
        let count = counts.get(&first.key).copied().unwrap_or(0);
        if count > thresholds.max_literal_repeats {
            issues.push(Issue::new(
                IssueKind::RepeatedHardcodedValue,
                first.line,
                format!("Value {} appears {} times in the code.", first.display, count),
                "Consider defining a constant for this value to improve maintainability.",
            ));
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract_source;

    fn repeated(source: &str) -> Vec<Issue> {
        let unit = extract_source("t.py", source);
        let tree = unit.tree.clone().expect("source should parse");
        detect_repeated_literals(&unit, &tree, &Thresholds::default()).unwrap()
    }

    #[test]
    fn test_string_three_times_reports_once() {
        let issues = repeated("a = 'hello'\nb = 'hello'\n\nc = \"hello\"\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].message, "Value 'hello' appears 3 times in the code.");
    }

    #[test]
    fn test_string_twice_reports_nothing() {
        assert!(repeated("a = 'hello'\nb = 'hello'\n").is_empty());
    }

    #[test]
    fn test_small_values_are_skipped() {
        let issues = repeated("a = [0, 0, 0, 1, 1, 1, -1, -1, -1, 'x', 'x', 'x', True, True, True]\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_numbers_are_grouped_by_value() {
        let issues = repeated("a = 100\nb = 1_00\nc = 0x64\nd = 2.5\ne = 2.5\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Value 100 appears 3 times in the code.");
    }

    #[test]
    fn test_numeric_rendering() {
        assert_eq!(numeric_literal("3.0"), Some("3.0".to_string()));
        assert_eq!(numeric_literal("1e3"), Some("1000.0".to_string()));
        assert_eq!(numeric_literal("0.5"), None);
        assert_eq!(numeric_literal("2j"), Some("2j".to_string()));
        assert_eq!(numeric_literal("0b101"), Some("5".to_string()));
    }

    #[test]
    fn test_escaped_single_characters_are_skipped() {
        let source = "a = \"\\n\".join(x)\nb = \"\\n\".join(y)\nc = \"\\n\".join(z)\nd = ['\\t', '\\t', '\\t']\n";
        assert!(repeated(source).is_empty());
    }

    #[test]
    fn test_strings_grouped_by_value() {
        let issues = repeated("a = 'a\\'b'\nb = \"a'b\"\nc = 'a\\x27b'\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].message, "Value \"a'b\" appears 3 times in the code.");
    }

    #[test]
    fn test_repr_style_display() {
        let issues = repeated("a = '\\n\\n'\nb = '\\n\\n'\nc = '\\n\\n'\n");
        assert_eq!(issues[0].message, "Value '\\n\\n' appears 3 times in the code.");
        assert_eq!(quote("tab\there", false), "'tab\\there'");
        assert_eq!(quote("\u{80}", true), "'\\x80'");
        assert_eq!(quote("it's \"x\"", false), "'it\\'s \"x\"'");
    }

    #[test]
    fn test_fstrings_are_not_constants() {
        assert!(repeated("a = f'hi {x}'\nb = f'hi {x}'\nc = f'hi {x}'\n").is_empty());
    }
}
