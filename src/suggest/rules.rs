//! Structural, best-practice and documentation heuristics.
//!
//! These look at declaration counts and raw source text only. None of them
//! need the parse tree except the module docstring check.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::analysis::python;
use crate::analysis::ParsedUnit;

use super::Suggestion;

lazy_static! {
    static ref CONSTANT_ASSIGNMENT: Regex = Regex::new(r"^[A-Z][A-Z0-9_]*\s*=").unwrap();
}

const MAIN_FUNCTION_EXAMPLE: &str = "def main():\n    # Your main logic here\n    pass\n\nif __name__ == '__main__':\n    main()";

const CLASS_EXAMPLE: &str = "class MyClass:\n    \"\"\"A class to encapsulate related functionality.\"\"\"\n    \n    def __init__(self):\n        # Initialize your class\n        pass\n    \n    def method1(self):\n        # First method\n        pass";

const DOCSTRING_EXAMPLE: &str = "def example_function():\n    \"\"\"This is a docstring.\n    \n    It can span multiple lines and provides documentation\n    that can be accessed through the __doc__ attribute.\n    \"\"\"\n    # Function implementation";

const ERROR_HANDLING_EXAMPLE: &str = "try:\n    result = potentially_risky_function()\nexcept SpecificError as e:\n    print(f\"An error occurred: {e}\")\n    # Handle the error appropriately";

const CONSTANTS_EXAMPLE: &str = "# Define constants at the top of your module\nMAX_RETRIES = 3\nDEFAULT_TIMEOUT = 30\nBASE_URL = 'https://api.example.com'";

const MODULE_DOCSTRING_EXAMPLE: &str = "\"\"\"Module name: Brief description.\n\nDetailed description of what this module does, how to use it,\nand any dependencies or important information.\n\"\"\"\n\n# Rest of your module code...";

const TYPE_HINTS_EXAMPLE: &str = "def calculate_total(items: list[float], tax_rate: float = 0.0) -> float:\n    \"\"\"Calculate the total price including tax.\n    \n    Args:\n        items: List of item prices\n        tax_rate: The tax rate as a decimal\n        \n    Returns:\n        The total price including tax\n    \"\"\"\n    subtotal = sum(items)\n    return subtotal * (1 + tax_rate)";

/// Entry point and grouping suggestions.
pub fn suggest_structure(unit: &ParsedUnit) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let functions = unit.functions().len();

    // Textual check, so a guard in any form counts
    let has_main_guard = unit.code.contains("__name__") && unit.code.contains("__main__");
    if !has_main_guard && functions > 0 {
        suggestions.push(
            Suggestion::new(
                "Add a main function with proper entry point",
                "Consider organizing your code with a main() function and use the if __name__ == '__main__' pattern to make the script both importable and executable.",
            )
            .with_example(MAIN_FUNCTION_EXAMPLE),
        );
    }

    if functions > 5 && unit.classes().is_empty() {
        suggestions.push(
            Suggestion::new(
                "Consider organizing functions into classes",
                "Your code has multiple functions but no classes. Consider organizing related functions into class(es) for better structure and maintainability.",
            )
            .with_example(CLASS_EXAMPLE),
        );
    }

    suggestions
}

/// Comment style, error handling and named constant suggestions.
pub fn suggest_best_practices(unit: &ParsedUnit) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let functions = unit.functions();

    let has_comments = unit.lines.iter().any(|line| {
        let stripped = line.trim();
        stripped.starts_with('#') && !stripped.starts_with("# ")
    });
    let has_docstrings = functions.iter().any(|f| f.docstring.is_some());
    if has_comments && !has_docstrings {
        suggestions.push(
            Suggestion::new(
                "Use docstrings instead of comments for function documentation",
                "Python has built-in support for documentation strings. Consider using docstrings for documenting functions and classes instead of comments.",
            )
            .with_example(DOCSTRING_EXAMPLE),
        );
    }

    let has_try_except = unit.code.contains("try:") && unit.code.contains("except");
    if !has_try_except && functions.len() > 2 {
        suggestions.push(
            Suggestion::new(
                "Add error handling",
                "Consider adding error handling with try-except blocks for robustness, especially for I/O operations, network calls, or user inputs.",
            )
            .with_example(ERROR_HANDLING_EXAMPLE),
        );
    }

    let has_constants = unit
        .lines
        .iter()
        .any(|line| CONSTANT_ASSIGNMENT.is_match(line));
    if !has_constants && unit.lines.len() > 30 {
        suggestions.push(
            Suggestion::new(
                "Define constants for magic values",
                "Consider defining constants at the module level for values that are used multiple times in your code.",
            )
            .with_example(CONSTANTS_EXAMPLE),
        );
    }

    suggestions
}

/// Module docstring and type annotation suggestions.
pub fn suggest_documentation(unit: &ParsedUnit) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let declarations = unit.declarations.count();

    match missing_module_docstring(unit) {
        Ok(true) if declarations > 1 => suggestions.push(
            Suggestion::new(
                "Add a module-level docstring",
                "Consider adding a module-level docstring to explain the purpose and usage of this module.",
            )
            .with_example(MODULE_DOCSTRING_EXAMPLE),
        ),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "module docstring check failed"),
    }

    if !has_type_hints(&unit.lines) && unit.functions().len() > 2 {
        suggestions.push(
            Suggestion::new(
                "Add type hints",
                "Consider adding type hints to function parameters and return values for better documentation and IDE support.",
            )
            .with_example(TYPE_HINTS_EXAMPLE),
        );
    }

    suggestions
}

/// Whether the module lacks a docstring. Units without a tree are skipped.
fn missing_module_docstring(unit: &ParsedUnit) -> anyhow::Result<bool> {
    let Some(tree) = &unit.tree else {
        return Ok(false);
    };
    let root = tree.root_node();
    if root.kind() != "module" {
        anyhow::bail!("unexpected root node '{}'", root.kind());
    }
    Ok(python::docstring(root, unit.source()).is_none())
}

/// Line heuristic for annotations.
///
/// A line with `->` counts, as does any `def` line holding a `:`. The colon
/// closing a one-line `def` header satisfies it, so only files whose
/// function headers span several lines are ever reported.
pub fn has_type_hints(lines: &[String]) -> bool {
    lines
        .iter()
        .any(|line| line.contains("->") || (line.contains("def ") && line.contains(':')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract_source;

    fn titles(suggestions: Vec<Suggestion>) -> Vec<String> {
        suggestions.into_iter().map(|s| s.title).collect()
    }

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(String::from).collect()
    }

    #[test]
    fn test_main_guard_and_class_grouping() {
        let code: String = (0..6).map(|i| format!("def f{}():\n    pass\n\n", i)).collect();
        let unit = extract_source("many.py", code);
        assert_eq!(
            titles(suggest_structure(&unit)),
            vec![
                "Add a main function with proper entry point",
                "Consider organizing functions into classes",
            ]
        );

        let guarded = extract_source(
            "guarded.py",
            "def main():\n    pass\n\nif __name__ == '__main__':\n    main()\n",
        );
        assert!(suggest_structure(&guarded).is_empty());
    }

    #[test]
    fn test_comment_without_space_prefers_docstrings() {
        let unit = extract_source("c.py", "#note\ndef f():\n    pass\n");
        assert_eq!(
            titles(suggest_best_practices(&unit)),
            vec!["Use docstrings instead of comments for function documentation"]
        );

        let spaced = extract_source("c.py", "# note\ndef f():\n    pass\n");
        assert!(suggest_best_practices(&spaced).is_empty());
    }

    #[test]
    fn test_error_handling_and_constants() {
        let mut code: String = (0..3).map(|i| format!("def f{}():\n    pass\n", i)).collect();
        code.push_str(&"x = 1\n".repeat(30));
        let unit = extract_source("big.py", code.clone());
        assert_eq!(
            titles(suggest_best_practices(&unit)),
            vec!["Add error handling", "Define constants for magic values"]
        );

        let with_constant = extract_source("big.py", format!("LIMIT = 3\n{}", code));
        assert_eq!(
            titles(suggest_best_practices(&with_constant)),
            vec!["Add error handling"]
        );
    }

    #[test]
    fn test_module_docstring() {
        let bare = extract_source("m.py", "def a():\n    pass\n\ndef b():\n    pass\n");
        assert_eq!(
            titles(suggest_documentation(&bare)),
            vec!["Add a module-level docstring"]
        );

        let documented = extract_source(
            "m.py",
            "\"\"\"Helpers.\"\"\"\n\ndef a():\n    pass\n\ndef b():\n    pass\n",
        );
        assert!(suggest_documentation(&documented).is_empty());
    }

    #[test]
    fn test_type_hint_heuristic() {
        assert!(has_type_hints(&lines("def f(x: int):\n    pass")));
        assert!(has_type_hints(&lines("def f(x) -> int:\n    return x")));
        assert!(has_type_hints(&lines("def f(x):\n    return x")));
        assert!(!has_type_hints(&lines("def f(\n    x\n):\n    return x")));
        assert!(!has_type_hints(&lines("x = {'a': 1}")));
    }

    #[test]
    fn test_one_line_headers_never_ask_for_hints() {
        let code: String = (0..3).map(|i| format!("def f{}(a):\n    return a\n", i)).collect();
        let unit = extract_source("h.py", format!("\"\"\"Doc.\"\"\"\n{}", code));
        assert!(suggest_documentation(&unit).is_empty());
    }

    #[test]
    fn test_missing_type_hints_needs_three_functions() {
        let code: String = (0..3)
            .map(|i| format!("def f{}(\n    a,\n):\n    return a\n", i))
            .collect();
        let unit = extract_source("h.py", format!("\"\"\"Doc.\"\"\"\n{}", code));
        assert_eq!(titles(suggest_documentation(&unit)), vec!["Add type hints"]);
    }
}
