//! Trucode - Python source analyzer.
//!
//! Trucode parses a single Python file, flags common structural problems
//! and produces improvement suggestions, optionally augmented by a
//! text-generation model.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `analysis`: Structural extraction into a [`ParsedUnit`]
//! - `detect`: Issue detection rules over the parsed unit
//! - `suggest`: Rule-based and model-derived suggestions
//! - `model`: Best-effort text-generation bridge with a file cache
//! - `worker`: Runs the pipeline on a background thread
//! - `config`: YAML configuration and environment overrides
//! - `report`: Output formatting (pretty, basic, JSON)
//!
//! # Example
//!
//! ```no_run
//! use trucode::{analysis, Detector, Suggester};
//!
//! let unit = analysis::extract("script.py");
//! let issues = Detector::new().detect(&unit);
//! let suggestions = Suggester::without_model().suggest(&unit, &issues);
//! println!("{} issues, {} suggestions", issues.len(), suggestions.len());
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod report;
pub mod suggest;
pub mod worker;

pub use analysis::{extract, extract_source, ParseError, ParsedUnit};
pub use config::{Config, ModelConfig, Thresholds};
pub use detect::{Detector, Issue, IssueKind};
pub use error::{Error, Result};
pub use model::{ModelAdapter, ModelAnalysis, TextGenerator};
pub use suggest::{Suggester, Suggestion};
pub use worker::{AnalysisEvent, AnalysisOptions, AnalysisOutcome};
