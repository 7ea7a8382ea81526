//! Python front end built on tree-sitter.
//!
//! Provides parsing, tree traversal helpers, and declaration extraction
//! (functions, classes, docstrings, parameters).

use tree_sitter::{Language, Node, Parser, Tree};

use super::{ClassDecl, Declarations, FunctionDecl};

/// The tree-sitter grammar for Python.
pub fn language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source into a tree-sitter tree.
///
/// The grammar is error tolerant: a tree is returned even for invalid code,
/// with `ERROR`/`MISSING` nodes marking the damage.
pub fn parse_tree(source: &str) -> anyhow::Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&language())?;
    parser
        .parse(source, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse Python source"))
}

/// All nodes below (and including) `root` in document order.
pub fn preorder(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Named children excluding comments.
pub fn statements(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Text of a node, empty if the bytes are not valid UTF-8.
pub fn node_text<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-indexed start line of a node.
pub fn start_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Whether `child` sits in `field` of `parent`.
pub fn is_field(parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    let mut cursor = parent.walk();
    let found = parent
        .children_by_field_name(field, &mut cursor)
        .any(|n| n.id() == child.id());
    found
}

/// A plain string literal's pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// Value between the quotes, escape sequences decoded unless raw.
    pub content: String,
    pub is_bytes: bool,
    /// f-string (formatted) literal.
    pub is_formatted: bool,
}

/// Decode a `string` or `concatenated_string` node.
pub fn string_literal(node: Node<'_>, source: &[u8]) -> Option<StringLiteral> {
    match node.kind() {
        "string" => {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            let start = children.iter().find(|c| c.kind() == "string_start")?;
            let end = children.iter().rev().find(|c| c.kind() == "string_end")?;
            let prefix = node_text(*start, source).to_ascii_lowercase();
            let is_bytes = prefix.contains('b');
            let written = source
                .get(start.end_byte()..end.start_byte())
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            let content = if prefix.contains('r') {
                written.into_owned()
            } else {
                unescape(&written, is_bytes)
            };
            let has_interpolation = children.iter().any(|c| c.kind() == "interpolation");
            Some(StringLiteral {
                content,
                is_bytes,
                is_formatted: has_interpolation || prefix.contains('f'),
            })
        }
        "concatenated_string" => {
            let mut joined = StringLiteral {
                content: String::new(),
                is_bytes: false,
                is_formatted: false,
            };
            for part in statements(node) {
                let piece = string_literal(part, source)?;
                joined.content.push_str(&piece.content);
                joined.is_bytes |= piece.is_bytes;
                joined.is_formatted |= piece.is_formatted;
            }
            Some(joined)
        }
        _ => None,
    }
}

/// Decode backslash escapes the way a non-raw literal is evaluated.
///
/// Unknown escapes and unresolvable `\N{...}` names are kept as written.
/// `\u`/`\U`/`\N` are only escapes in text literals.
pub fn unescape(written: &str, is_bytes: bool) -> String {
    let mut out = String::with_capacity(written.len());
    let mut chars = written.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\\' | '\'' | '"' => out.push(next),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                match char::from_u32(value) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&format!("\\{:o}", value)),
                }
            }
            'x' => push_hex(&mut out, &mut chars, 'x', 2),
            'u' if !is_bytes => push_hex(&mut out, &mut chars, 'u', 4),
            'U' if !is_bytes => push_hex(&mut out, &mut chars, 'U', 8),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Decode exactly `digits` hex digits, or keep the escape as written.
fn push_hex(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    marker: char,
    digits: usize,
) {
    let mut hex = String::with_capacity(digits);
    while hex.len() < digits {
        match chars.peek() {
            Some(d) if d.is_ascii_hexdigit() => {
                hex.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = if hex.len() == digits {
        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    } else {
        None
    };
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(&hex);
        }
    }
}

/// Docstring of a module, class or function body, cleaned.
///
/// The first statement must be a bare plain-string expression.
pub fn docstring(body: Node<'_>, source: &[u8]) -> Option<String> {
    let first = *statements(body).first()?;
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let literal = string_literal(first.named_child(0)?, source)?;
    if literal.is_bytes || literal.is_formatted {
        return None;
    }
    let cleaned = clean_docstring(&literal.content);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalise docstring indentation: strip the first line, remove the common
/// indentation of the remaining lines, drop leading/trailing blank lines.
pub fn clean_docstring(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start().to_string());
    }
    for line in lines.iter().skip(1) {
        let cut = margin.min(leading_whitespace(line));
        let rest: String = line.chars().skip(cut).collect();
        cleaned.push(rest.trim_end().to_string());
    }

    while cleaned.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        cleaned.pop();
    }
    while cleaned.first().map(|l| l.trim().is_empty()).unwrap_or(false) {
        cleaned.remove(0);
    }
    cleaned.join("\n").trim_end().to_string()
}

/// Leading whitespace of a line, in characters.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Greatest start line among named descendants, or the node's own line.
fn last_line(node: Node<'_>) -> usize {
    preorder(node)
        .into_iter()
        .filter(|n| n.is_named() && n.kind() != "comment")
        .map(start_line)
        .max()
        .unwrap_or_else(|| start_line(node))
}

/// Positional parameter names in declaration order.
///
/// Collection stops at the first `*`, `*args` or `**kwargs`, so keyword-only
/// and variadic parameters are not counted. The `/` marker is skipped.
fn parameter_names(params: Node<'_>, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    for param in statements(params) {
        let name_node = match param.kind() {
            "identifier" => Some(param),
            "default_parameter" | "typed_default_parameter" => param.child_by_field_name("name"),
            "typed_parameter" => match param.named_child(0) {
                Some(n) if n.kind() == "identifier" => Some(n),
                Some(_) => break,
                None => None,
            },
            "positional_separator" => None,
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => None,
        };
        if let Some(n) = name_node.filter(|n| n.kind() == "identifier") {
            names.push(node_text(n, source).to_string());
        }
    }
    names
}

/// The function or class wrapped by a `decorated_definition`, or the node.
pub fn undecorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

fn function_decl(node: Node<'_>, source: &[u8]) -> Option<FunctionDecl> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| parameter_names(p, source))
        .unwrap_or_default();
    let docstring = node
        .child_by_field_name("body")
        .and_then(|b| docstring(b, source));

    Some(FunctionDecl {
        name,
        docstring,
        parameters,
        start_line: start_line(node),
        end_line: last_line(node),
    })
}

fn class_decl(node: Node<'_>, source: &[u8]) -> Option<ClassDecl> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    let body = node.child_by_field_name("body");

    let method_names = body
        .map(|b| {
            statements(b)
                .into_iter()
                .map(undecorated)
                .filter(|n| n.kind() == "function_definition")
                .filter_map(|n| n.child_by_field_name("name"))
                .map(|n| node_text(n, source).to_string())
                .collect()
        })
        .unwrap_or_default();

    Some(ClassDecl {
        name,
        docstring: body.and_then(|b| docstring(b, source)),
        method_names,
        start_line: start_line(node),
        end_line: last_line(node),
    })
}

/// Collect function and class declarations in document order.
pub fn extract_declarations(tree: &Tree, source: &[u8]) -> Declarations {
    let mut declarations = Declarations::default();

    for node in preorder(tree.root_node()) {
        match node.kind() {
            "function_definition" => {
                if let Some(func) = function_decl(node, source) {
                    declarations.functions.push(func);
                }
            }
            "class_definition" => {
                if let Some(class) = class_decl(node, source) {
                    declarations.classes.push(class);
                }
            }
            _ => {}
        }
    }

    declarations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations(source: &str) -> Declarations {
        let tree = parse_tree(source).unwrap();
        extract_declarations(&tree, source.as_bytes())
    }

    #[test]
    fn test_extract_functions_and_parameters() {
        let source = r#"
def simple():
    pass

def with_args(a, b=1, *args, c: int, d: str = "x", **kwargs):
    return a

async def fetch(url):
    return url
"#;
        let decls = declarations(source);
        let names: Vec<_> = decls.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["simple", "with_args", "fetch"]);

        let with_args = &decls.functions[1];
        assert_eq!(with_args.parameters, vec!["a", "b"]);
        assert_eq!(with_args.start_line, 5);
    }

    #[test]
    fn test_only_positional_parameters_are_counted() {
        let decls = declarations(
            "def f(a, b, c, d, *args, **kwargs):\n    pass\n\ndef g(a, b, /, c, *, d):\n    pass\n\ndef h(self, *items: int):\n    pass\n",
        );
        assert_eq!(decls.functions[0].parameters, vec!["a", "b", "c", "d"]);
        assert_eq!(decls.functions[1].parameters, vec!["a", "b", "c"]);
        assert_eq!(decls.functions[2].parameters, vec!["self"]);
    }

    #[test]
    fn test_extract_class_with_methods() {
        let source = r#"
class Greeter:
    """Says hello."""

    def __init__(self, name):
        self.name = name

    @staticmethod
    def shout(text):
        return text.upper()
"#;
        let decls = declarations(source);
        assert_eq!(decls.classes.len(), 1);
        let class = &decls.classes[0];
        assert_eq!(class.name, "Greeter");
        assert_eq!(class.docstring.as_deref(), Some("Says hello."));
        assert_eq!(class.method_names, vec!["__init__", "shout"]);
        assert_eq!(class.start_line, 2);
        assert_eq!(class.end_line, 10);

        // methods are functions too
        assert_eq!(decls.functions.len(), 2);
    }

    #[test]
    fn test_docstring_cleaning() {
        let source = "def f():\n    \"\"\"Summary line.\n\n    Details here.\n    \"\"\"\n    return 1\n";
        let decls = declarations(source);
        assert_eq!(
            decls.functions[0].docstring.as_deref(),
            Some("Summary line.\n\nDetails here.")
        );
    }

    #[test]
    fn test_docstring_with_unicode_indentation() {
        let source = "def f():\n    \"\"\"Summary\n     a\n    \u{a0}b\n    \u{3000}c\n    \"\"\"\n    return 1\n";
        let decls = declarations(source);
        assert_eq!(
            decls.functions[0].docstring.as_deref(),
            Some("Summary\na\nb\nc")
        );
        assert_eq!(clean_docstring("x\n\u{a0}\u{a0}y\n    z"), "x\ny\n  z");
    }

    #[test]
    fn test_escapes_are_decoded() {
        assert_eq!(unescape(r"\n", false), "\n");
        assert_eq!(unescape(r"a\'b", false), "a'b");
        assert_eq!(unescape(r"\x41\101\u00e9\t", false), "AAé\t");
        assert_eq!(unescape(r"\u00e9\d", true), r"\u00e9\d");
        assert_eq!(unescape("line\\\nnext", false), "linenext");
        assert_eq!(unescape(r"\N{BULLET}", false), r"\N{BULLET}");
    }

    #[test]
    fn test_raw_strings_keep_backslashes() {
        let source = "x = r'\\n'\ny = '\\n'\n";
        let tree = parse_tree(source).unwrap();
        let literals: Vec<_> = preorder(tree.root_node())
            .into_iter()
            .filter(|n| n.kind() == "string")
            .filter_map(|n| string_literal(n, source.as_bytes()))
            .map(|l| l.content)
            .collect();
        assert_eq!(literals, vec!["\\n", "\n"]);
    }

    #[test]
    fn test_fstring_and_empty_docstrings_do_not_count() {
        let source = "def f():\n    f\"hi {x}\"\n\ndef g():\n    \"\"\n";
        let decls = declarations(source);
        assert_eq!(decls.functions[0].docstring, None);
        assert_eq!(decls.functions[1].docstring, None);
    }

    #[test]
    fn test_end_line_uses_last_statement() {
        let source = "def f(x):\n    y = x\n\n    # trailing comment\n    return y\n";
        let decls = declarations(source);
        assert_eq!(decls.functions[0].start_line, 1);
        assert_eq!(decls.functions[0].end_line, 5);
    }
}
