//! Human-readable file summaries.

use super::Declarations;

const SMALL_FILE_LINES: usize = 50;
const MEDIUM_FILE_LINES: usize = 200;
const MAX_LISTED_IMPORTS: usize = 5;

/// Build the one-paragraph description of a parsed file.
pub fn describe(
    filename: &str,
    language: &str,
    line_count: usize,
    imports: &[String],
    declarations: &Declarations,
    parse_failed: bool,
) -> String {
    let mut parts = Vec::new();

    let mut opening = format!("This file '{}' is a {} source file.", filename, language);
    if parse_failed {
        opening.push_str(" (Note: This file contains syntax errors)");
    }
    parts.push(opening);

    parts.push(if line_count < SMALL_FILE_LINES {
        format!("It is a relatively small file ({} lines).", line_count)
    } else if line_count < MEDIUM_FILE_LINES {
        format!("It is a medium-sized file ({} lines).", line_count)
    } else {
        format!("It is a large file ({} lines).", line_count)
    });

    if !imports.is_empty() {
        let listed: Vec<&str> = imports
            .iter()
            .take(MAX_LISTED_IMPORTS)
            .map(String::as_str)
            .collect();
        let tail = if imports.len() > MAX_LISTED_IMPORTS {
            ", and others..."
        } else {
            "."
        };
        parts.push(format!(
            "It imports {} module(s): {}{}",
            imports.len(),
            listed.join(", "),
            tail
        ));
    }

    let classes = &declarations.classes;
    if !classes.is_empty() {
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        parts.push(format!(
            "It defines {} class(es): {}.",
            classes.len(),
            names.join(", ")
        ));
    }

    let functions = &declarations.functions;
    if !functions.is_empty() {
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        parts.push(format!(
            "It contains {} function(s): {}.",
            functions.len(),
            names.join(", ")
        ));
    }

    if declarations.is_empty() {
        parts.push(if parse_failed {
            "Due to syntax errors, function and class analysis could not be performed.".to_string()
        } else {
            "It appears to be a script with no function or class definitions.".to_string()
        });
    }

    parts.join(" ")
}

/// Description for a file that could not be read.
pub fn describe_unreadable(filename: &str, reason: &str) -> String {
    format!(
        "This file '{}' could not be processed due to error: {}",
        filename, reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ClassDecl, FunctionDecl};

    fn function(name: &str) -> FunctionDecl {
        FunctionDecl {
            name: name.to_string(),
            docstring: None,
            parameters: vec![],
            start_line: 1,
            end_line: 1,
        }
    }

    #[test]
    fn test_describe_declarations_and_imports() {
        let imports: Vec<String> = ["os", "sys", "re", "json", "math", "time"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let declarations = Declarations {
            functions: vec![function("main"), function("helper")],
            classes: vec![ClassDecl {
                name: "Widget".to_string(),
                docstring: None,
                method_names: vec![],
                start_line: 1,
                end_line: 2,
            }],
        };

        let text = describe("tool.py", "Python", 120, &imports, &declarations, false);
        assert_eq!(
            text,
            "This file 'tool.py' is a Python source file. \
             It is a medium-sized file (120 lines). \
             It imports 6 module(s): os, sys, re, json, math, and others... \
             It defines 1 class(es): Widget. \
             It contains 2 function(s): main, helper."
        );
    }

    #[test]
    fn test_describe_failed_parse_without_declarations() {
        let text = describe("bad.py", "Python", 3, &[], &Declarations::default(), true);
        assert!(text.starts_with(
            "This file 'bad.py' is a Python source file. (Note: This file contains syntax errors)"
        ));
        assert!(text.contains("It is a relatively small file (3 lines)."));
        assert!(text.ends_with("function and class analysis could not be performed."));
    }

    #[test]
    fn test_describe_script_without_declarations() {
        let text = describe("s.py", "Python", 250, &["os".to_string()], &Declarations::default(), false);
        assert!(text.contains("It is a large file (250 lines)."));
        assert!(text.contains("It imports 1 module(s): os."));
        assert!(text.ends_with("no function or class definitions."));
    }
}
