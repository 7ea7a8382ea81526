//! Command-line interface for trucode.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::report;
use crate::worker::{self, AnalysisOptions};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Analyze Python code for issues and suggestions.
///
/// Parses one source file, reports structural problems such as unused
/// imports, bare excepts and overly long functions, and suggests
/// improvements. A text-generation model can add further suggestions when
/// an endpoint is configured.
#[derive(Parser)]
#[command(name = "trucode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the Python file to analyze
    pub file_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable AI analysis
    #[arg(long)]
    pub no_ai: bool,

    /// Force detailed analysis even for files with syntax errors
    #[arg(long)]
    pub force: bool,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run an analysis and print the report.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    // Validate format
    if cli.format != "pretty" && cli.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            cli.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let config = if cli.no_ai {
        config.without_model()
    } else {
        config
    };

    let options = AnalysisOptions { force: cli.force };
    let handle = worker::spawn(cli.file_path.clone(), options, config);
    let outcome = match handle.wait(|message| eprintln!("{}", message)) {
        Ok(outcome) => outcome,
        Err(message) => {
            eprintln!("Error: {}", message);
            return Ok(EXIT_ERROR);
        }
    };

    match cli.format.as_str() {
        "json" => report::write_json(&outcome)?,
        _ => report::write_pretty(&outcome, cli.verbose)?,
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["trucode", "app.py", "-v", "--no-ai", "--force"]).unwrap();
        assert_eq!(cli.file_path, PathBuf::from("app.py"));
        assert!(cli.verbose);
        assert!(cli.no_ai);
        assert!(cli.force);
        assert_eq!(cli.format, "pretty");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["trucode"]).is_err());
    }

    #[test]
    fn test_bad_format_exits_with_error() {
        let cli = Cli::try_parse_from(["trucode", "app.py", "--format", "sarif"]).unwrap();
        assert_eq!(run(&cli).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_missing_file_exits_with_error() {
        let cli = Cli::try_parse_from(["trucode", "/no/such/file.py", "--no-ai"]).unwrap();
        assert_eq!(run(&cli).unwrap(), EXIT_ERROR);
    }
}
