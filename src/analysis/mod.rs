//! Structural extraction of Python source files.
//!
//! Turns a file into a [`ParsedUnit`]: declarations, imports, source lines,
//! the tree-sitter tree, parse-failure details and a short description.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ Source File │────▶│ syntax::parse │────▶│ ParsedUnit   │
//! └─────────────┘     │ (tree-sitter +│     │ (decls,      │
//!                     │  line checks) │     │  imports,    │
//!                     └───────────────┘     │  description)│
//!                             │ failure     └──────────────┘
//!                             ▼                    ▲
//!                     ┌───────────────┐            │
//!                     │ scan_imports  │────────────┘
//!                     └───────────────┘
//! ```
//!
//! Extraction never fails: unreadable or invalid files yield a unit with
//! `parse_failed` set.

mod describe;
mod facts;
pub mod imports;
mod language;
pub mod python;
pub mod syntax;

use std::path::Path;

use tracing::{debug, warn};

pub use describe::{describe, describe_unreadable};
pub use facts::{ClassDecl, Declarations, FunctionDecl, ParseError, ParsedUnit};
pub use imports::{import_bindings, scan_imports, ImportBinding};
pub use language::language_label;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and extract a file.
pub fn extract<P: AsRef<Path>>(path: P) -> ParsedUnit {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(code) => extract_source(path, code),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to read source file");
            let filename = file_name(path);
            ParsedUnit {
                path: path.display().to_string(),
                description: describe_unreadable(&filename, &e.to_string()),
                filename,
                language: language_label(path).to_string(),
                code: String::new(),
                lines: Vec::new(),
                declarations: Declarations::default(),
                imports: Vec::new(),
                tree: None,
                parse_failed: true,
                parse_error: Some(ParseError::unpositioned(e.to_string())),
            }
        }
    }
}

/// Extract already-loaded source; `path` is used for naming only.
pub fn extract_source<P: AsRef<Path>>(path: P, code: impl Into<String>) -> ParsedUnit {
    let path = path.as_ref();
    let code = code.into();
    let filename = file_name(path);
    let language = language_label(path).to_string();
    let lines: Vec<String> = code.split('\n').map(str::to_string).collect();

    let (tree, declarations, imports, parse_error) = match syntax::parse(&code) {
        Ok(tree) => {
            let declarations = python::extract_declarations(&tree, code.as_bytes());
            let imports = match imports::imports_from_tree(&tree, code.as_bytes()) {
                Ok(imports) => imports,
                Err(e) => {
                    warn!(error = %e, "import query failed, falling back to line scan");
                    scan_imports(&lines)
                }
            };
            (Some(tree), declarations, imports, None)
        }
        Err(error) => {
            debug!(path = %path.display(), error = %error, "structural parse failed");
            (None, Declarations::default(), scan_imports(&lines), Some(error))
        }
    };

    let parse_failed = parse_error.is_some();
    let description = describe(
        &filename,
        &language,
        lines.len(),
        &imports,
        &declarations,
        parse_failed,
    );

    ParsedUnit {
        path: path.display().to_string(),
        filename,
        language,
        code,
        lines,
        declarations,
        imports,
        tree,
        parse_failed,
        parse_error,
        description,
    }
}
