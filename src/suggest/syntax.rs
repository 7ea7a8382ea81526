//! Remedies for files that could not be parsed.

use super::Suggestion;

const INDENTATION_EXAMPLE: &str = "# Correct indentation example:\ndef example_function():\n    # This line is indented with 4 spaces\n    print('Hello, World!')\n\n    if True:\n        # This line is indented with 8 spaces (4 more than parent)\n        print('Inside if block')";

const INDENTED_BLOCK_EXAMPLE: &str = "# Correct indentation example:\nif condition:\n    # This line must be indented\n    do_something()\n\n# Instead of:\nif condition:\ndo_something()  # This will cause an indentation error";

const INVALID_SYNTAX_EXAMPLE: &str = "# Common syntax examples:\n# Missing colon\nif condition  # Error\n    print('Hi')\n\n# Correct version\nif condition:  # Note the colon\n    print('Hi')";

const UNCLOSED_EXAMPLE: &str = "# Examples of properly closed structures:\nmy_list = [1, 2, 3]  # Opening and closing brackets\nmy_dict = {'key': 'value'}  # Opening and closing braces\nmy_string = \"Hello, world!\"  # Opening and closing quotes";

const CHECKLIST_EXAMPLE: &str = "# Common Python syntax error checklist:\n# 1. Check indentation (use 4 spaces consistently)\n# 2. Ensure all parentheses, brackets, and braces are properly closed\n# 3. Check for missing colons after if, for, while, etc.\n# 4. Make sure all strings are properly closed\n# 5. Verify that keywords are used correctly";

const LINTER_EXAMPLE: &str = "# Install a linter:\n# pip install flake8\n\n# Run the linter on your code:\n# flake8 your_file.py";

/// Remedies for a parse error message, followed by the linter suggestion.
///
/// The first three categories match case-insensitively; `EOF` is matched
/// as written.
pub fn syntax_error_suggestions(message: &str) -> Vec<Suggestion> {
    let lowered = message.to_lowercase();

    let remedy = if lowered.contains("unexpected indent") {
        Suggestion::new(
            "Fix indentation issues",
            "There appears to be an indentation error in your code. Python uses indentation to define code blocks.",
        )
        .with_example(INDENTATION_EXAMPLE)
    } else if lowered.contains("expected an indented block") {
        Suggestion::new(
            "Add proper indentation after block statements",
            "After statements like 'if', 'for', 'while', etc., you need an indented block of code.",
        )
        .with_example(INDENTED_BLOCK_EXAMPLE)
    } else if lowered.contains("invalid syntax") {
        Suggestion::new(
            "Check for syntax errors",
            "There's a syntax error in your code. Common causes include missing parentheses, brackets, colons, or invalid Python statements.",
        )
        .with_example(INVALID_SYNTAX_EXAMPLE)
    } else if message.contains("EOF") {
        Suggestion::new(
            "Check for unclosed brackets or quotes",
            "You might have unclosed parentheses, brackets, or quotation marks in your code.",
        )
        .with_example(UNCLOSED_EXAMPLE)
    } else {
        Suggestion::new(
            "Fix syntax errors before analysis",
            format!(
                "Your code contains a syntax error: {}. Fix this error to enable proper code analysis.",
                message
            ),
        )
        .with_example(CHECKLIST_EXAMPLE)
    };

    vec![
        remedy,
        Suggestion::new(
            "Use a linter to catch syntax errors",
            "Consider using a Python linter like flake8, pylint, or an IDE with built-in linting to catch syntax errors as you write code.",
        )
        .with_example(LINTER_EXAMPLE),
    ]
}
