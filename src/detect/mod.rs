//! Detection of common problems in Python source.

mod basic;
mod builtins;
mod exceptions;
mod functions;
mod literals;
mod main_guard;
mod names;
mod runner;
mod syntax;
mod types;

pub use basic::{basic_checks, format_line_list, BasicChecks};
pub use builtins::is_builtin;
pub use exceptions::detect_bare_excepts;
pub use functions::{detect_complex_functions, detect_missing_docstrings};
pub use literals::{collect_literals, detect_repeated_literals, Literal};
pub use main_guard::{detect_missing_main_guard, has_main_guard};
pub use names::{
    classify, collect_names, detect_undefined_names, detect_unused_imports,
    detect_unused_variables, NameContext, NameUsage,
};
pub use runner::Detector;
pub use syntax::{detect_syntax_errors, syntax_error_issue};
pub use types::{Issue, IssueKind};
