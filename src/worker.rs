//! Background analysis.
//!
//! The whole pipeline runs on its own thread and reports back over a
//! channel, so an interactive front end never blocks while a slow model
//! call is in flight. There is no cancellation; callers that lose interest
//! simply drop the handle and late events are discarded.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::analysis::{self, ParsedUnit};
use crate::config::Config;
use crate::detect::{Detector, Issue};
use crate::error::{Error, Result};
use crate::suggest::{Suggester, Suggestion};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Run detection and suggestions even when parsing failed.
    pub force: bool,
}

/// What a finished analysis produced.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The file has syntax errors and `force` was off.
    Basic { unit: ParsedUnit },
    /// Detection and suggestions ran.
    Full {
        unit: ParsedUnit,
        issues: Vec<Issue>,
        suggestions: Vec<Suggestion>,
    },
}

impl AnalysisOutcome {
    pub fn unit(&self) -> &ParsedUnit {
        match self {
            AnalysisOutcome::Basic { unit } | AnalysisOutcome::Full { unit, .. } => unit,
        }
    }
}

/// Messages sent from the worker thread. Exactly one terminal event
/// (`Finished` or `Failed`) is sent per run.
#[derive(Debug)]
pub enum AnalysisEvent {
    Progress(String),
    Finished(Box<AnalysisOutcome>),
    Failed(String),
}

impl AnalysisEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnalysisEvent::Progress(_))
    }
}

/// Run the pipeline on the calling thread.
///
/// `progress` receives a short status line before each stage.
pub fn run<F>(path: &Path, options: AnalysisOptions, config: &Config, mut progress: F) -> Result<AnalysisOutcome>
where
    F: FnMut(&str),
{
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    progress(&format!("Analyzing {}...", path.display()));
    let code = std::fs::read_to_string(path).map_err(|source| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let unit = analysis::extract_source(path, code);

    if unit.parse_failed && !options.force {
        debug!(path = %unit.path, "syntax errors found, producing basic report");
        return Ok(AnalysisOutcome::Basic { unit });
    }

    progress("Detecting code issues...");
    let detector = Detector::new().with_thresholds(config.thresholds.clone());
    let issues = detector.detect(&unit);

    progress("Generating improvement suggestions...");
    let suggester = Suggester::new(config);
    let suggestions = suggester.suggest(&unit, &issues);

    Ok(AnalysisOutcome::Full {
        unit,
        issues,
        suggestions,
    })
}

/// Handle to an analysis running on a worker thread.
pub struct AnalysisHandle {
    events: Receiver<AnalysisEvent>,
    thread: JoinHandle<()>,
}

impl AnalysisHandle {
    /// Block for the next event. `None` once the worker is gone.
    pub fn recv(&self) -> Option<AnalysisEvent> {
        self.events.recv().ok()
    }

    /// Events in arrival order, ending after the worker exits.
    pub fn iter(&self) -> mpsc::Iter<'_, AnalysisEvent> {
        self.events.iter()
    }

    /// Drain events until the terminal one, passing progress lines to
    /// `on_progress`.
    pub fn wait<F>(self, mut on_progress: F) -> std::result::Result<AnalysisOutcome, String>
    where
        F: FnMut(&str),
    {
        let mut result = Err("analysis worker exited without a result".to_string());
        for event in self.events.iter() {
            match event {
                AnalysisEvent::Progress(message) => on_progress(&message),
                AnalysisEvent::Finished(outcome) => {
                    result = Ok(*outcome);
                    break;
                }
                AnalysisEvent::Failed(message) => {
                    result = Err(message);
                    break;
                }
            }
        }
        if self.thread.join().is_err() {
            return Err("analysis worker panicked".to_string());
        }
        result
    }
}

/// Start an analysis on a new thread.
pub fn spawn(path: PathBuf, options: AnalysisOptions, config: Config) -> AnalysisHandle {
    let (tx, rx) = mpsc::channel();
    let thread = thread::spawn(move || worker_main(&path, options, &config, tx));
    AnalysisHandle { events: rx, thread }
}

fn worker_main(path: &Path, options: AnalysisOptions, config: &Config, tx: Sender<AnalysisEvent>) {
    // Send failures mean the receiver was dropped; results are then ignored.
    let progress_tx = tx.clone();
    let outcome = run(path, options, config, |message| {
        let _ = progress_tx.send(AnalysisEvent::Progress(message.to_string()));
    });

    let event = match outcome {
        Ok(outcome) => AnalysisEvent::Finished(Box::new(outcome)),
        Err(e) => AnalysisEvent::Failed(e.to_string()),
    };
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn offline() -> Config {
        Config::default().without_model()
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = run(Path::new("/no/such/file.py"), AnalysisOptions::default(), &offline(), |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_syntax_error_gives_basic_outcome() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.py");
        std::fs::write(&path, "def f(:\n    pass\n").unwrap();

        let mut messages = Vec::new();
        let outcome = run(&path, AnalysisOptions::default(), &offline(), |m| {
            messages.push(m.to_string())
        })
        .unwrap();
        assert!(matches!(outcome, AnalysisOutcome::Basic { .. }));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Analyzing "));
    }

    #[test]
    fn test_force_runs_syntax_only_pipeline() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.py");
        std::fs::write(&path, "def f(:\n    pass\n").unwrap();

        let outcome = run(&path, AnalysisOptions { force: true }, &offline(), |_| {}).unwrap();
        match outcome {
            AnalysisOutcome::Full {
                issues,
                suggestions,
                ..
            } => {
                // Still gated on the missing tree
                assert_eq!(issues.len(), 1);
                assert_eq!(suggestions.len(), 2);
                assert_eq!(suggestions[1].title, "Use a linter to catch syntax errors");
            }
            other => panic!("expected full outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_spawn_reports_progress_then_result() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ok.py");
        std::fs::write(&path, "\"\"\"Doc.\"\"\"\nprint('hi')\n").unwrap();

        let handle = spawn(path, AnalysisOptions::default(), offline());
        let mut progress = Vec::new();
        let outcome = handle.wait(|m| progress.push(m.to_string())).unwrap();

        assert_eq!(progress.len(), 3);
        assert_eq!(progress[1], "Detecting code issues...");
        assert_eq!(progress[2], "Generating improvement suggestions...");
        assert!(matches!(outcome, AnalysisOutcome::Full { .. }));
        assert!(!outcome.unit().parse_failed);
    }

    #[test]
    fn test_spawn_failure_event() {
        let handle = spawn(
            PathBuf::from("/no/such/file.py"),
            AnalysisOptions::default(),
            offline(),
        );
        let event = handle.recv().unwrap();
        assert!(event.is_terminal());
        match event {
            AnalysisEvent::Failed(message) => assert!(message.starts_with("File not found")),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
