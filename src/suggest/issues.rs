//! Canned suggestions keyed by detected issue kinds.

use std::collections::HashSet;

use crate::detect::{Issue, IssueKind};

use super::Suggestion;

const DOCSTRINGS_EXAMPLE: &str = "def example_function(param1, param2):\n    \"\"\"Short description of what the function does.\n    \n    Args:\n        param1: Description of param1\n        param2: Description of param2\n        \n    Returns:\n        Description of return value\n        \n    Raises:\n        ExceptionType: When and why this exception is raised\n    \"\"\"\n    # Function implementation";

const IMPORTS_EXAMPLE: &str = "# Instead of\nimport os\nimport sys\nimport numpy  # Unused\n\n# Use only what you need\nimport os\nimport sys";

const REFACTOR_EXAMPLE: &str = "# Instead of one large function\ndef process_data(data):\n    # 50+ lines of code\n    pass\n\n# Break it down\ndef validate_data(data):\n    # Validation logic\n    pass\n\ndef transform_data(data):\n    # Transformation logic\n    pass\n\ndef process_data(data):\n    validated_data = validate_data(data)\n    return transform_data(validated_data)";

const SYNTAX_FIXES_EXAMPLE: &str = "# Common syntax error fixes:\n\n# 1. Fix indentation (use consistent spaces)\ndef function():\n    print('Properly indented')\n\n# 2. Add missing colons\nif condition:\n    print('Colon added')\n\n# 3. Close all brackets and quotes\nmy_list = [1, 2, 3]  # Closed bracket\nmy_string = \"Complete string\"  # Closed quotes";

/// One suggestion per distinct issue kind that has a canned remedy.
///
/// Order is fixed regardless of issue order: docstrings, imports, function
/// decomposition, syntax errors.
pub fn suggest_from_issues(issues: &[Issue]) -> Vec<Suggestion> {
    let kinds: HashSet<IssueKind> = issues.iter().map(|issue| issue.kind).collect();
    let mut suggestions = Vec::new();

    if kinds.contains(&IssueKind::MissingDocstring) {
        suggestions.push(
            Suggestion::new(
                "Add comprehensive docstrings",
                "Add descriptive docstrings to all functions and classes to improve code readability and maintainability.",
            )
            .with_example(DOCSTRINGS_EXAMPLE),
        );
    }

    if kinds.contains(&IssueKind::UnusedImport) {
        suggestions.push(
            Suggestion::new(
                "Clean up imports",
                "Remove unused imports to keep your code clean and improve loading time.",
            )
            .with_example(IMPORTS_EXAMPLE),
        );
    }

    if kinds.contains(&IssueKind::ComplexFunction) {
        suggestions.push(
            Suggestion::new(
                "Refactor complex functions",
                "Break down complex functions into smaller, more focused functions with single responsibilities.",
            )
            .with_example(REFACTOR_EXAMPLE),
        );
    }

    if kinds.contains(&IssueKind::SyntaxError) {
        suggestions.push(
            Suggestion::new(
                "Fix syntax errors",
                "Your code contains syntax errors that prevent proper execution. Fix these errors before proceeding with further development.",
            )
            .with_example(SYNTAX_FIXES_EXAMPLE),
        );
    }

    suggestions
}
