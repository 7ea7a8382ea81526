//! Entry-point guard check.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::analysis::python::{language, node_text, string_literal};
use crate::analysis::ParsedUnit;

use super::{Issue, IssueKind};

/// Conditions of top-level `if` statements.
const GUARD_QUERY: &str = r#"
(module
  (if_statement
    condition: (_) @condition))
"#;

/// Strip any number of enclosing parentheses.
fn unparenthesized(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn is_main_comparison(condition: Node<'_>, source: &[u8]) -> bool {
    let condition = unparenthesized(condition);
    if condition.kind() != "comparison_operator" || condition.named_child_count() != 2 {
        return false;
    }
    let left = condition.named_child(0).map(unparenthesized);
    let right = condition.named_child(1).map(unparenthesized);
    let operator = condition
        .child(1)
        .map(|op| node_text(op, source) == "==")
        .unwrap_or(false);

    let left_is_name = left
        .map(|n| n.kind() == "identifier" && node_text(n, source) == "__name__")
        .unwrap_or(false);
    let right_is_main = right
        .and_then(|n| string_literal(n, source))
        .map(|lit| !lit.is_bytes && !lit.is_formatted && lit.content == "__main__")
        .unwrap_or(false);

    operator && left_is_name && right_is_main
}

/// Whether the module has an `if __name__ == "__main__":` block.
pub fn has_main_guard(tree: &Tree, source: &[u8]) -> anyhow::Result<bool> {
    let query = Query::new(&language(), GUARD_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);

    while let Some(m) = matches.next() {
        if m.captures
            .iter()
            .any(|capture| is_main_comparison(capture.node, source))
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Files that define functions but have no entry-point guard.
pub fn detect_missing_main_guard(unit: &ParsedUnit, tree: &Tree) -> anyhow::Result<Vec<Issue>> {
    if unit.functions().is_empty() || has_main_guard(tree, unit.source())? {
        return Ok(Vec::new());
    }

    Ok(vec![Issue::new(
        IssueKind::MissingMainGuard,
        unit.lines.len(),
        "Missing 'if __name__ == \"__main__\":' guard for script code.",
        "Add 'if __name__ == \"__main__\":' guard to make the script importable without executing the main code.",
    )])
}
