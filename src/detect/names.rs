//! Name binding and usage checks.
//!
//! A single flow-insensitive pass splits every identifier into bound
//! (store position), read (load position) or neither. Scopes are not
//! modelled: a name bound anywhere counts as bound everywhere.

use std::collections::HashSet;

use regex::Regex;
use tree_sitter::{Node, Tree};

use crate::analysis::python::{is_field, node_text, preorder, start_line};
use crate::analysis::{import_bindings, ParsedUnit};

use super::builtins::is_builtin;
use super::{Issue, IssueKind};

/// How an identifier is used at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    Load,
    Store,
    /// Declarations, parameters, attributes, imports and the like.
    Ignored,
}

/// Node kinds a store target can be nested in (unpacking and grouping).
const TARGET_CONTAINERS: &[&str] = &[
    "pattern_list",
    "tuple_pattern",
    "list_pattern",
    "list_splat_pattern",
    "tuple",
    "list",
    "parenthesized_expression",
    "expression_list",
    "list_splat",
];

const PARAMETER_LISTS: &[&str] = &["parameters", "lambda_parameters", "typed_parameter"];

/// Classify an `identifier` node.
pub fn classify(node: Node<'_>) -> NameContext {
    let parent = match node.parent() {
        Some(p) => p,
        None => return NameContext::Load,
    };

    match parent.kind() {
        "function_definition" | "class_definition" if is_field(parent, "name", node) => {
            return NameContext::Ignored
        }
        "attribute" if is_field(parent, "attribute", node) => return NameContext::Ignored,
        "keyword_argument" if is_field(parent, "name", node) => return NameContext::Ignored,
        "default_parameter" | "typed_default_parameter" if is_field(parent, "name", node) => {
            return NameContext::Ignored
        }
        "parameters" | "lambda_parameters" | "typed_parameter" => return NameContext::Ignored,
        "list_splat_pattern" | "dictionary_splat_pattern"
            if parent
                .parent()
                .map(|g| PARAMETER_LISTS.contains(&g.kind()))
                .unwrap_or(false) =>
        {
            return NameContext::Ignored
        }
        "import_statement"
        | "import_from_statement"
        | "future_import_statement"
        | "dotted_name"
        | "aliased_import"
        | "relative_import"
        | "global_statement"
        | "nonlocal_statement" => return NameContext::Ignored,
        "except_clause" | "except_group_clause" => {
            let after_as = node
                .prev_sibling()
                .map(|s| s.kind() == "as")
                .unwrap_or(false);
            if after_as {
                return NameContext::Ignored;
            }
        }
        "named_expression" if is_field(parent, "name", node) => return NameContext::Store,
        "as_pattern_target" => {
            let in_except = parent
                .parent()
                .and_then(|p| p.parent())
                .map(|g| matches!(g.kind(), "except_clause" | "except_group_clause"))
                .unwrap_or(false);
            return if in_except {
                NameContext::Ignored
            } else {
                NameContext::Store
            };
        }
        _ => {}
    }

    // climb out of unpacking containers to find the enclosing statement
    let mut target = node;
    let mut holder = parent;
    while TARGET_CONTAINERS.contains(&holder.kind()) {
        target = holder;
        holder = match holder.parent() {
            Some(p) => p,
            None => return NameContext::Load,
        };
    }

    match holder.kind() {
        "assignment" | "augmented_assignment" | "for_statement" | "for_in_clause"
            if is_field(holder, "left", target) =>
        {
            NameContext::Store
        }
        "delete_statement" => NameContext::Ignored,
        _ => NameContext::Load,
    }
}

/// Bound and read names of a whole file.
#[derive(Debug, Default)]
pub struct NameUsage {
    pub bound: HashSet<String>,
    /// Read names, de-duplicated, in first-discovery order.
    pub read: Vec<String>,
    read_set: HashSet<String>,
    /// `(name, line)` for bare-name targets of plain assignments.
    pub assigned: Vec<(String, usize)>,
}

impl NameUsage {
    pub fn is_read(&self, name: &str) -> bool {
        self.read_set.contains(name)
    }

    fn add_read(&mut self, name: &str) {
        if self.read_set.insert(name.to_string()) {
            self.read.push(name.to_string());
        }
    }

    fn add_assigned(&mut self, name: &str, line: usize) {
        if !self.assigned.iter().any(|(n, _)| n == name) {
            self.assigned.push((name.to_string(), line));
        }
    }
}

/// Walk the tree once and collect name usage.
pub fn collect_names(tree: &Tree, source: &[u8]) -> NameUsage {
    let mut usage = NameUsage::default();

    for node in preorder(tree.root_node()) {
        match node.kind() {
            "identifier" => {
                let name = node_text(node, source);
                match classify(node) {
                    NameContext::Store => {
                        usage.bound.insert(name.to_string());
                    }
                    NameContext::Load => usage.add_read(name),
                    NameContext::Ignored => {}
                }
            }
            // annotated assignments are not plain assignments
            "assignment" if node.child_by_field_name("type").is_none() => {
                if let Some(left) = node
                    .child_by_field_name("left")
                    .filter(|l| l.kind() == "identifier")
                {
                    usage.add_assigned(node_text(left, source), start_line(left));
                }
            }
            _ => {}
        }
    }

    usage
}

/// First 1-indexed line containing `name` as a whole word.
fn first_line_with_word(lines: &[String], name: &str) -> anyhow::Result<Option<usize>> {
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(name)))?;
    Ok(lines
        .iter()
        .position(|line| pattern.is_match(line))
        .map(|i| i + 1))
}

/// Names read somewhere but never bound and not builtin.
pub fn detect_undefined_names(unit: &ParsedUnit, tree: &Tree) -> anyhow::Result<Vec<Issue>> {
    let usage = collect_names(tree, unit.source());
    let mut issues = Vec::new();

    for name in &usage.read {
        if usage.bound.contains(name) || is_builtin(name) {
            continue;
        }
        if let Some(line) = first_line_with_word(&unit.lines, name)? {
            issues.push(Issue::new(
                IssueKind::PotentialUndefinedVariable,
                line,
                format!("Variable '{}' is used but might not be defined.", name),
                format!(
                    "Make sure '{}' is defined before use, or check for typos.",
                    name
                ),
            ));
        }
    }

    Ok(issues)
}

/// Imports whose bound name is never read.
pub fn detect_unused_imports(unit: &ParsedUnit, tree: &Tree) -> anyhow::Result<Vec<Issue>> {
    let usage = collect_names(tree, unit.source());
    let mut reported = HashSet::new();
    let mut issues = Vec::new();

    for binding in import_bindings(tree, unit.source())? {
        let Some(bound) = binding.bound else {
            continue;
        };
        if usage.is_read(&bound) || !reported.insert(bound.clone()) {
            continue;
        }
        issues.push(Issue::new(
            IssueKind::UnusedImport,
            binding.line,
            format!("Import '{}' is not used in the code.", bound),
            "Remove the unused import to make the code cleaner.",
        ));
    }

    Ok(issues)
}

/// Plain assignments to names that are never read.
pub fn detect_unused_variables(unit: &ParsedUnit, tree: &Tree) -> anyhow::Result<Vec<Issue>> {
    let usage = collect_names(tree, unit.source());

    Ok(usage
        .assigned
        .iter()
        .filter(|(name, _)| !usage.is_read(name) && !name.starts_with('_'))
        .map(|(name, line)| {
            Issue::new(
                IssueKind::UnusedVariable,
                *line,
                format!("Variable '{}' is assigned but never used.", name),
                "Remove the unused variable or prefix with underscore (_) if intentional.",
            )
        })
        .collect())
}
