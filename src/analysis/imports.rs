//! Import extraction.
//!
//! Imports come from the tree when parsing succeeded, and from line-anchored
//! regex scanning when it did not.

use lazy_static::lazy_static;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use super::python::{language, node_text, start_line};

/// Tree-sitter query for import statements.
const IMPORT_QUERY: &str = r#"
(import_statement) @import
(import_from_statement) @import_from
(future_import_statement) @future
"#;

lazy_static! {
    static ref PLAIN_IMPORT: Regex = Regex::new(r"^import\s+([a-zA-Z0-9_.]+)").unwrap();
    static ref FROM_IMPORT: Regex =
        Regex::new(r"^from\s+([a-zA-Z0-9_.]+)\s+import\s+([a-zA-Z0-9_., ]+)").unwrap();
}

/// One name brought into scope by an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Name as listed in `ParsedUnit::imports`: the top-level package of a
    /// plain import, the alias of an aliased `from` import, else `M.N`.
    pub listed: String,
    /// Name the import binds locally, `None` for `__future__` features.
    pub bound: Option<String>,
    /// Line of the import statement.
    pub line: usize,
}

/// Join a `from` module and an imported name.
fn qualify(module: &str, name: &str) -> String {
    if module.ends_with('.') {
        format!("{}{}", module, name)
    } else {
        format!("{}.{}", module, name)
    }
}

fn field_nodes<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let nodes: Vec<_> = node.children_by_field_name(field, &mut cursor).collect();
    nodes
}

/// `(dotted_name, alias)` for a `dotted_name` or `aliased_import` node.
fn name_and_alias<'s>(node: Node<'_>, source: &'s [u8]) -> (&'s str, Option<&'s str>) {
    if node.kind() == "aliased_import" {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(n, source))
            .unwrap_or("");
        let alias = node.child_by_field_name("alias").map(|n| node_text(n, source));
        (name, alias)
    } else {
        (node_text(node, source), None)
    }
}

fn plain_import(node: Node<'_>, source: &[u8], out: &mut Vec<ImportBinding>) {
    let line = start_line(node);
    for target in field_nodes(node, "name") {
        let (name, alias) = name_and_alias(target, source);
        if name.is_empty() {
            continue;
        }
        let top_level = name.split('.').next().unwrap_or(name);
        out.push(ImportBinding {
            listed: top_level.to_string(),
            bound: Some(alias.unwrap_or(top_level).to_string()),
            line,
        });
    }
}

fn from_import(node: Node<'_>, source: &[u8], future: bool, out: &mut Vec<ImportBinding>) {
    let line = start_line(node);
    let module = if future {
        "__future__"
    } else {
        node.child_by_field_name("module_name")
            .map(|n| node_text(n, source))
            .unwrap_or("")
    };

    for target in field_nodes(node, "name") {
        let (name, alias) = name_and_alias(target, source);
        if name.is_empty() {
            continue;
        }
        out.push(ImportBinding {
            listed: match alias {
                Some(alias) => alias.to_string(),
                None => qualify(module, name),
            },
            bound: if future {
                None
            } else {
                Some(alias.unwrap_or(name).to_string())
            },
            line,
        });
    }
}

/// Import bindings in document order. Wildcard imports bind nothing.
pub fn import_bindings(tree: &Tree, source: &[u8]) -> anyhow::Result<Vec<ImportBinding>> {
    let query = Query::new(&language(), IMPORT_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);

    let mut bindings = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            match query.capture_names()[capture.index as usize] {
                "import" => plain_import(node, source, &mut bindings),
                "import_from" => from_import(node, source, false, &mut bindings),
                "future" => from_import(node, source, true, &mut bindings),
                _ => {}
            }
        }
    }

    Ok(bindings)
}

/// Listed import names in document order.
pub fn imports_from_tree(tree: &Tree, source: &[u8]) -> anyhow::Result<Vec<String>> {
    Ok(import_bindings(tree, source)?
        .into_iter()
        .map(|b| b.listed)
        .collect())
}

/// Best-effort import recovery for source that did not parse.
///
/// One statement per physical line; multi-line imports are not recovered.
pub fn scan_imports(lines: &[String]) -> Vec<String> {
    let mut imports = Vec::new();

    for line in lines {
        let stripped = line.trim();
        if let Some(caps) = PLAIN_IMPORT.captures(stripped) {
            imports.push(caps[1].to_string());
        } else if let Some(caps) = FROM_IMPORT.captures(stripped) {
            let module = &caps[1];
            for name in caps[2].split(',') {
                let name = name.trim();
                if !name.is_empty() && name != "*" {
                    imports.push(qualify(module, name));
                }
            }
        }
    }

    imports
}
