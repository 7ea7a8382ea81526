//! Fact structures extracted from a single source file.

use std::fmt;

use serde::Serialize;

/// Where and why structural parsing failed.
///
/// `line` and `column` are absent when the file could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// Line of the problem (1-indexed).
    pub line: Option<usize>,
    /// Column of the problem (1-indexed).
    pub column: Option<usize>,
    /// Human-readable parser message.
    pub message: String,
}

impl ParseError {
    /// A syntax problem at a known position.
    pub fn at(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            message: message.into(),
        }
    }

    /// A failure with no source position (I/O).
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self {
            line: None,
            column: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A function (or method) declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    /// Cleaned docstring; `None` when absent or empty.
    pub docstring: Option<String>,
    /// Parameter names in declaration order, without `*`/`**`.
    pub parameters: Vec<String>,
    /// Line of the `def` keyword (1-indexed).
    pub start_line: usize,
    /// Greatest start line of any node inside the declaration.
    pub end_line: usize,
}

impl FunctionDecl {
    /// Number of lines spanned beyond the first.
    pub fn length(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
    pub name: String,
    pub docstring: Option<String>,
    /// Functions declared directly in the class body.
    pub method_names: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
}

/// Declarations found in a file, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Declarations {
    pub functions: Vec<FunctionDecl>,
    pub classes: Vec<ClassDecl>,
}

impl Declarations {
    /// Total number of functions and classes.
    pub fn count(&self) -> usize {
        self.functions.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Result of structural extraction for one file.
///
/// Constructed once per analysis request and never mutated afterwards.
/// When `parse_failed` is set the tree is absent, declarations are empty and
/// `imports` come from line scanning.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    /// Path as given by the caller.
    pub path: String,
    /// File name component of `path`.
    pub filename: String,
    /// Language label used in the description (e.g. "Python").
    pub language: String,
    /// Full source text.
    pub code: String,
    /// Source split on `\n`.
    pub lines: Vec<String>,
    pub declarations: Declarations,
    /// Qualified import names (`X.Y` for `from X import Y`).
    pub imports: Vec<String>,
    /// Parse tree, present only when extraction fully succeeded.
    pub tree: Option<tree_sitter::Tree>,
    pub parse_failed: bool,
    pub parse_error: Option<ParseError>,
    /// One-paragraph human summary.
    pub description: String,
}

impl ParsedUnit {
    /// Functions in document order.
    pub fn functions(&self) -> &[FunctionDecl] {
        &self.declarations.functions
    }

    /// Classes in document order.
    pub fn classes(&self) -> &[ClassDecl] {
        &self.declarations.classes
    }

    /// Whether a usable parse tree is available.
    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Whether the file itself could not be read.
    pub fn read_failed(&self) -> bool {
        self.parse_failed
            && self
                .parse_error
                .as_ref()
                .map(|e| e.line.is_none())
                .unwrap_or(false)
    }

    /// Text of a 1-indexed line, if it exists.
    pub fn line(&self, number: usize) -> Option<&str> {
        if number == 0 {
            return None;
        }
        self.lines.get(number - 1).map(String::as_str)
    }

    /// Source bytes, for tree-sitter node text lookups.
    pub fn source(&self) -> &[u8] {
        self.code.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_with_lines(lines: &[&str]) -> ParsedUnit {
        ParsedUnit {
            path: "t.py".to_string(),
            filename: "t.py".to_string(),
            language: "Python".to_string(),
            code: lines.join("\n"),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            declarations: Declarations::default(),
            imports: Vec::new(),
            tree: None,
            parse_failed: false,
            parse_error: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_line_lookup_is_one_indexed() {
        let unit = unit_with_lines(&["a = 1", "b = 2"]);
        assert_eq!(unit.line(0), None);
        assert_eq!(unit.line(1), Some("a = 1"));
        assert_eq!(unit.line(2), Some("b = 2"));
        assert_eq!(unit.line(3), None);
    }

    #[test]
    fn test_read_failed_requires_unpositioned_error() {
        let mut unit = unit_with_lines(&[]);
        unit.parse_failed = true;
        unit.parse_error = Some(ParseError::unpositioned("permission denied"));
        assert!(unit.read_failed());

        unit.parse_error = Some(ParseError::at(3, 1, "invalid syntax"));
        assert!(!unit.read_failed());
    }

    #[test]
    fn test_function_length() {
        let func = FunctionDecl {
            name: "f".to_string(),
            docstring: None,
            parameters: vec![],
            start_line: 10,
            end_line: 61,
        };
        assert_eq!(func.length(), 51);
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::at(4, 2, "invalid syntax").to_string(),
            "line 4: invalid syntax"
        );
        assert_eq!(ParseError::unpositioned("gone").to_string(), "gone");
    }
}
