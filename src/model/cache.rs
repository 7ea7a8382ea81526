//! File-based cache for model analyses.
//!
//! One JSON file per key, stored in ~/.cache/trucode/model/ by default.
//! Entries never expire. Concurrent writers for the same key race and the
//! last write wins; the values are expected to be identical.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{AnalysisOrigin, ModelAnalysis, ModelError};

/// Number of leading snippet characters that form the cache key.
const KEY_PREFIX_CHARS: usize = 100;

/// Cache key for a snippet: hex SHA-256 of its first 100 characters.
pub fn cache_key(snippet: &str) -> String {
    let prefix: String = snippet.chars().take(KEY_PREFIX_CHARS).collect();
    format!("{:x}", Sha256::digest(prefix.as_bytes()))
}

/// Directory of cached analyses.
#[derive(Debug, Clone)]
pub struct ModelCache {
    dir: PathBuf,
}

impl ModelCache {
    /// Use `dir`, creating it if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        if let Err(e) = fs::create_dir_all(&dir) {
            debug!(dir = %dir.display(), error = %e, "could not create cache directory");
        }
        Self { dir }
    }

    /// The platform cache directory for trucode.
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("", "", "trucode").map(|dirs| Self::new(dirs.cache_dir().join("model")))
    }

    /// The configured directory, else the platform default.
    pub fn from_dir(dir: Option<&Path>) -> Option<Self> {
        match dir {
            Some(dir) => Some(Self::new(dir)),
            None => Self::default_location(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a cache key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("analysis_{}.json", key))
    }

    /// Read an entry. Missing or unreadable entries are `None`.
    pub fn get(&self, key: &str) -> Option<ModelAnalysis> {
        let path = self.path_for(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<ModelAnalysis>(&content) {
            Ok(mut analysis) => {
                analysis.origin = AnalysisOrigin::Cached;
                Some(analysis)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                None
            }
        }
    }

    /// Write an entry.
    pub fn put(&self, key: &str, analysis: &ModelAnalysis) -> Result<(), ModelError> {
        let content =
            serde_json::to_string(analysis).map_err(|e| ModelError::Cache(e.to_string()))?;
        fs::write(self.path_for(key), content).map_err(|e| ModelError::Cache(e.to_string()))
    }
}
