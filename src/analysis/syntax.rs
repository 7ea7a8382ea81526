//! Syntax validation for Python source.
//!
//! tree-sitter recovers from most errors, so a tree alone does not say the
//! file is valid Python. Validation combines two passes:
//!
//! - a logical-line scan that tracks strings, brackets and the indentation
//!   stack the way the Python tokenizer does, and
//! - a walk of the tree looking for `ERROR`/`MISSING` nodes, compound
//!   statements with empty bodies and Python 2 `print`/`exec` statements.
//!
//! The problem on the earliest line is reported.

use tree_sitter::{Node, Tree};

use super::python::{parse_tree, preorder, statements};
use super::ParseError;

pub const UNEXPECTED_INDENT: &str = "unexpected indent";
pub const EXPECTED_INDENTED_BLOCK: &str = "expected an indented block";
pub const UNINDENT_MISMATCH: &str = "unindent does not match any outer indentation level";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const UNEXPECTED_EOF: &str = "unexpected EOF while parsing";
pub const EOL_IN_STRING: &str = "EOL while scanning string literal";
pub const EOF_IN_TRIPLE_STRING: &str = "EOF while scanning triple-quoted string literal";
pub const INCONSISTENT_TABS: &str = "inconsistent use of tabs and spaces in indentation";

const TAB_SIZE: usize = 8;
/// Tab size of the alternate column used to spot ambiguous indentation.
const ALT_TAB_SIZE: usize = 1;

/// Parse `source`, returning the tree only if it is free of syntax errors.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let lexical = validate_lines(source).err();

    let tree = match parse_tree(source) {
        Ok(tree) => tree,
        Err(e) => {
            return Err(lexical.unwrap_or_else(|| ParseError::at(1, 1, e.to_string())));
        }
    };

    let total_lines = source.split('\n').count();
    let structural = first_tree_error(tree.root_node(), source, total_lines);

    match earliest(lexical, structural) {
        Some(error) => Err(error),
        None => Ok(tree),
    }
}

/// Pick the error on the earlier line; ties go to `first`.
fn earliest(first: Option<ParseError>, second: Option<ParseError>) -> Option<ParseError> {
    match (first, second) {
        (Some(a), Some(b)) => {
            if b.line.unwrap_or(1) < a.line.unwrap_or(1) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, b) => a.or(b),
    }
}

fn first_tree_error(root: Node<'_>, source: &str, total_lines: usize) -> Option<ParseError> {
    for node in preorder(root) {
        let pos = node.start_position();
        if node.is_missing() {
            let message = if node.start_byte() >= source.trim_end().len() {
                UNEXPECTED_EOF.to_string()
            } else {
                format!("expected '{}'", node.kind())
            };
            return Some(ParseError::at(pos.row + 1, pos.column + 1, message));
        }
        if node.is_error() {
            return Some(ParseError::at(pos.row + 1, pos.column + 1, INVALID_SYNTAX));
        }
        // An empty body is parsed as a bare newline aliased to `block`.
        if node.kind() == "block" && statements(node).is_empty() {
            let line = (pos.row + 2).min(total_lines.max(1));
            return Some(ParseError::at(line, 1, EXPECTED_INDENTED_BLOCK));
        }
        if is_legacy_statement(node, source) {
            return Some(ParseError::at(pos.row + 1, pos.column + 1, INVALID_SYNTAX));
        }
    }
    None
}

/// A Python 2 `print`/`exec` statement that is not also a valid call.
///
/// `print (x)` and `exec (code) in ns` read as calls once the parentheses
/// directly follow the keyword, so only other forms are rejected.
fn is_legacy_statement(node: Node<'_>, source: &str) -> bool {
    if !matches!(node.kind(), "print_statement" | "exec_statement") {
        return false;
    }
    let keyword_end = node.child(0).map(|k| k.end_byte()).unwrap_or(node.start_byte());
    let rest = source.get(keyword_end..node.end_byte()).unwrap_or("");
    !rest.trim_start().starts_with('(')
}

#[derive(Debug, Clone, Copy)]
struct OpenString {
    quote: char,
    triple: bool,
    line: usize,
    column: usize,
}

#[derive(Debug)]
struct LogicalLine {
    line: usize,
    indent: usize,
    /// Indentation with tabs counted as one column.
    alt_indent: usize,
    last: Option<char>,
}

impl LogicalLine {
    fn opens_block(&self) -> bool {
        self.last == Some(':')
    }
}

/// Width of leading whitespace, tabs advancing to the next multiple of
/// `tab_size`.
fn indent_width(text: &str, tab_size: usize) -> usize {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / tab_size + 1) * tab_size,
            '\x0c' => width = 0,
            _ => break,
        }
    }
    width
}

fn validate_lines(source: &str) -> Result<(), ParseError> {
    let logical = logical_lines(source)?;
    let total_lines = source.split('\n').count();
    check_indentation(&logical, total_lines)
}

/// Split source into logical lines, reporting tokenizer-level errors.
fn logical_lines(source: &str) -> Result<Vec<LogicalLine>, ParseError> {
    let mut logical = Vec::new();
    let mut brackets: Vec<(usize, usize)> = Vec::new();
    let mut string: Option<OpenString> = None;
    let mut continued = false;
    let mut current: Option<LogicalLine> = None;
    let mut line_no = 0;

    for (row, raw) in source.split('\n').enumerate() {
        line_no = row + 1;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let joining = string.is_some() || !brackets.is_empty() || continued;
        continued = false;

        if !joining {
            let trimmed = text.trim_start_matches([' ', '\t', '\x0c']);
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            current = Some(LogicalLine {
                line: line_no,
                indent: indent_width(text, TAB_SIZE),
                alt_indent: indent_width(text, ALT_TAB_SIZE),
                last: None,
            });
        }

        let chars: Vec<char> = text.chars().collect();
        let mut escaped_eol = false;
        let mut last = current.as_ref().and_then(|l| l.last);
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match string {
                Some(open) => {
                    if c == '\\' {
                        escaped_eol = i + 1 == chars.len();
                        i += 2;
                        continue;
                    }
                    if c == open.quote {
                        if !open.triple {
                            string = None;
                        } else if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                            string = None;
                            last = Some(c);
                            i += 3;
                            continue;
                        }
                    }
                }
                None => match c {
                    '#' => break,
                    '\'' | '"' => {
                        let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                        string = Some(OpenString {
                            quote: c,
                            triple,
                            line: line_no,
                            column: i + 1,
                        });
                        if triple {
                            last = Some(c);
                            i += 3;
                            continue;
                        }
                    }
                    '(' | '[' | '{' => brackets.push((line_no, i + 1)),
                    ')' | ']' | '}' => {
                        brackets.pop();
                    }
                    '\\' if i + 1 == chars.len() => {
                        continued = true;
                        i += 1;
                        continue;
                    }
                    _ => {}
                },
            }
            if !c.is_whitespace() {
                last = Some(c);
            }
            i += 1;
        }

        if let Some(line) = current.as_mut() {
            line.last = last;
        }

        if let Some(open) = string {
            if !open.triple && !escaped_eol {
                return Err(ParseError::at(open.line, open.column, EOL_IN_STRING));
            }
        }

        if string.is_none() && brackets.is_empty() && !continued {
            if let Some(line) = current.take() {
                logical.push(line);
            }
        }
    }

    if let Some(open) = string {
        return Err(ParseError::at(open.line, open.column, EOF_IN_TRIPLE_STRING));
    }
    if let Some(&(line, column)) = brackets.first() {
        return Err(ParseError::at(line, column, UNEXPECTED_EOF));
    }
    if continued {
        return Err(ParseError::at(line_no.max(1), 1, UNEXPECTED_EOF));
    }

    Ok(logical)
}

/// Replay the tokenizer's indentation stack.
///
/// Each level is tracked at tab size 8 and tab size 1. Lines that compare
/// differently under the two sizes depend on the tab size and are rejected.
fn check_indentation(lines: &[LogicalLine], total_lines: usize) -> Result<(), ParseError> {
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
    let mut pending_block: Option<usize> = None;

    for line in lines {
        let (top, alt_top) = stack.last().copied().unwrap_or((0, 0));
        let column = line.indent + 1;
        let tab_error = || ParseError::at(line.line, column, INCONSISTENT_TABS);

        if pending_block.take().is_some() {
            if line.indent <= top {
                return Err(ParseError::at(line.line, column, EXPECTED_INDENTED_BLOCK));
            }
            if line.alt_indent <= alt_top {
                return Err(tab_error());
            }
            stack.push((line.indent, line.alt_indent));
        } else if line.indent == top {
            if line.alt_indent != alt_top {
                return Err(tab_error());
            }
        } else if line.indent > top {
            return Err(ParseError::at(line.line, column, UNEXPECTED_INDENT));
        } else {
            while stack.last().map(|&(w, _)| w > line.indent).unwrap_or(false) {
                stack.pop();
            }
            let (width, alt_width) = stack.last().copied().unwrap_or((0, 0));
            if width != line.indent {
                return Err(ParseError::at(line.line, column, UNINDENT_MISMATCH));
            }
            if alt_width != line.alt_indent {
                return Err(tab_error());
            }
        }

        if line.opens_block() {
            pending_block = Some(line.line);
        }
    }

    if let Some(header) = pending_block {
        let line = (header + 1).min(total_lines.max(header));
        return Err(ParseError::at(line, 1, EXPECTED_INDENTED_BLOCK));
    }

    Ok(())
}
