//! Exception handling checks.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor, Tree};

use crate::analysis::python::{language, start_line, statements};
use crate::analysis::ParsedUnit;

use super::{Issue, IssueKind};

const HANDLER_QUERY: &str = "(except_clause) @handler";

/// `except:` clauses that name no exception type.
pub fn detect_bare_excepts(unit: &ParsedUnit, tree: &Tree) -> anyhow::Result<Vec<Issue>> {
    let query = Query::new(&language(), HANDLER_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), unit.source());

    let mut issues = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let handler = capture.node;
            let catches_type = statements(handler)
                .into_iter()
                .any(|child| child.kind() != "block");
            if catches_type {
                continue;
            }
            issues.push(Issue::new(
                IssueKind::BareException,
                start_line(handler),
                "Using a bare 'except:' clause catches all exceptions, including KeyboardInterrupt and SystemExit.",
                "Catch specific exceptions instead, like 'except ValueError:' or use 'except Exception:' if necessary.",
            ));
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract_source;

    #[test]
    fn test_bare_except_detected() {
        let unit = extract_source(
            "t.py",
            "try:\n    risky()\nexcept ValueError:\n    pass\nexcept (KeyError, TypeError) as e:\n    pass\nexcept:\n    pass\n",
        );
        let tree = unit.tree.clone().unwrap();
        let issues = detect_bare_excepts(&unit, &tree).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 7);
        assert_eq!(issues[0].kind, IssueKind::BareException);
    }

    #[test]
    fn test_nested_bare_excepts_in_functions() {
        let unit = extract_source(
            "t.py",
            "def a():\n    try:\n        pass\n    except:\n        pass\n\ndef b():\n    try:\n        pass\n    except Exception:\n        pass\n",
        );
        let tree = unit.tree.clone().unwrap();
        let issues = detect_bare_excepts(&unit, &tree).unwrap();
        let lines: Vec<_> = issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![4]);
    }
}
