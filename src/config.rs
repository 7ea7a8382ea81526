//! Configuration for trucode.
//!
//! Settings come from an optional YAML file, then environment variables.
//! Every field has a default, so an empty or missing file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Config file names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["trucode.yaml", ".trucode.yaml"];

/// Model used when none is configured.
pub const DEFAULT_MODEL_NAME: &str = "Salesforce/codegen-350M-mono";

pub const ENV_MODEL_ENDPOINT: &str = "TRUCODE_MODEL_ENDPOINT";
pub const ENV_MODEL_NAME: &str = "TRUCODE_MODEL_NAME";
pub const ENV_MODEL_API_KEY: &str = "TRUCODE_MODEL_API_KEY";
pub const ENV_CACHE_DIR: &str = "TRUCODE_CACHE_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Text-generation model settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    /// When false the model is treated as unavailable.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// OpenAI-compatible completions URL. No endpoint means no model.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Directory for cached responses (default: platform cache dir).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            name: default_model_name(),
            api_key: None,
            cache_dir: None,
        }
    }
}

/// Limits used by the detector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Thresholds {
    /// Functions spanning more lines than this are flagged.
    #[serde(default = "default_max_function_lines")]
    pub max_function_lines: usize,
    /// Functions with more parameters than this are flagged.
    #[serde(default = "default_max_parameters")]
    pub max_parameters: usize,
    /// Literals repeated more times than this are flagged.
    #[serde(default = "default_max_literal_repeats")]
    pub max_literal_repeats: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_function_lines: default_max_function_lines(),
            max_parameters: default_max_parameters(),
            max_literal_repeats: default_max_literal_repeats(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_max_function_lines() -> usize {
    50
}

fn default_max_parameters() -> usize {
    5
}

fn default_max_literal_repeats() -> usize {
    2
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config from YAML text. Empty text yields defaults.
    pub fn parse_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Find a config file in `dir` using the default names.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Load the explicit file, or a discovered one, or defaults; then apply
    /// environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover("."),
        };

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::parse_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = non_empty(ENV_MODEL_ENDPOINT) {
            self.model.endpoint = Some(endpoint);
        }
        if let Some(name) = non_empty(ENV_MODEL_NAME) {
            self.model.name = name;
        }
        if let Some(key) = non_empty(ENV_MODEL_API_KEY) {
            self.model.api_key = Some(key);
        }
        if let Some(dir) = non_empty(ENV_CACHE_DIR) {
            self.model.cache_dir = Some(PathBuf::from(dir));
        }
    }

    /// Turn the model off for this run.
    pub fn without_model(mut self) -> Self {
        self.model.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.model.enabled);
        assert_eq!(config.model.endpoint, None);
        assert_eq!(config.model.name, DEFAULT_MODEL_NAME);
        assert_eq!(config.thresholds.max_function_lines, 50);
        assert_eq!(config.thresholds.max_parameters, 5);
        assert_eq!(config.thresholds.max_literal_repeats, 2);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
model:
  endpoint: "http://localhost:8080/v1/completions"
thresholds:
  max_parameters: 3
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert!(config.model.enabled);
        assert_eq!(
            config.model.endpoint.as_deref(),
            Some("http://localhost:8080/v1/completions")
        );
        assert_eq!(config.model.name, DEFAULT_MODEL_NAME);
        assert_eq!(config.thresholds.max_parameters, 3);
        assert_eq!(config.thresholds.max_function_lines, 50);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::parse_str("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MODEL_ENDPOINT, "http://model"),
            (ENV_MODEL_NAME, "tiny"),
            (ENV_CACHE_DIR, "/tmp/cache"),
            (ENV_MODEL_API_KEY, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.model.endpoint.as_deref(), Some("http://model"));
        assert_eq!(config.model.name, "tiny");
        assert_eq!(config.model.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(config.model.api_key, None);
    }

    #[test]
    fn test_discover_and_parse_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Config::discover(temp.path()), None);

        let path = temp.path().join(".trucode.yaml");
        std::fs::write(&path, "model:\n  enabled: false\n").unwrap();
        assert_eq!(Config::discover(temp.path()), Some(path.clone()));

        let config = Config::parse_file(&path).unwrap();
        assert!(!config.model.enabled);
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("trucode.yaml");
        std::fs::write(&path, "thresholds: [not, a, map]\n").unwrap();
        let err = Config::parse_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("trucode.yaml"));
    }

    #[test]
    fn test_without_model() {
        assert!(!Config::default().without_model().model.enabled);
    }
}
