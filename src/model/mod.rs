//! Best-effort bridge to an external text-generation model.
//!
//! The model is optional. Every failure (no endpoint configured, network
//! error, bad response, cache I/O) turns into a canned fallback payload;
//! nothing here returns an error to the caller of [`ModelAdapter::analyze`].

mod adapter;
mod cache;
mod http;
mod prompt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use adapter::ModelAdapter;
pub use cache::{cache_key, ModelCache};
pub use http::HttpGenerator;
pub use prompt::{build_prompt, extract_suggestions, ANALYSIS_MARKER};

/// Errors raised while talking to the model or its cache.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model endpoint returned HTTP {0}")]
    Status(u16),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("cache error: {0}")]
    Cache(String),
}

/// Decoding parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_tokens: usize,
    /// Number of samples.
    pub n: usize,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            n: 1,
            temperature: 0.5,
        }
    }
}

/// A text-generation capability.
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`, returning the generated text.
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError>;
}

/// Where an analysis payload came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisOrigin {
    /// Fresh model output.
    Generated,
    /// Read from the response cache.
    #[default]
    Cached,
    /// No model could be acquired.
    Unavailable,
    /// The model call failed.
    Failed,
}

/// Result of a model analysis, as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAnalysis {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_analysis: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Not persisted; entries read back from disk are `Cached`.
    #[serde(skip)]
    pub origin: AnalysisOrigin,
}

impl ModelAnalysis {
    /// Payload returned when no model is available.
    pub fn unavailable() -> Self {
        Self {
            description: "Basic code analysis (AI model not available)".to_string(),
            full_analysis: None,
            suggestions: vec![
                "Consider adding comments to explain complex logic".to_string(),
                "Add error handling for robust code".to_string(),
                "Break down large functions into smaller ones".to_string(),
            ],
            origin: AnalysisOrigin::Unavailable,
        }
    }

    /// Payload returned when the model call fails.
    pub fn failed() -> Self {
        Self {
            description: "Error during AI analysis".to_string(),
            full_analysis: None,
            suggestions: vec![
                "Add proper error handling".to_string(),
                "Ensure code follows PEP 8 style guidelines".to_string(),
                "Consider adding unit tests".to_string(),
            ],
            origin: AnalysisOrigin::Failed,
        }
    }

    /// Payload built from fresh model output.
    pub fn generated(full_analysis: String, suggestions: Vec<String>) -> Self {
        Self {
            description: "AI-powered code analysis".to_string(),
            full_analysis: Some(full_analysis),
            suggestions,
            origin: AnalysisOrigin::Generated,
        }
    }

    /// Whether this came from a model rather than a fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self.origin,
            AnalysisOrigin::Unavailable | AnalysisOrigin::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_payloads_differ() {
        let unavailable = ModelAnalysis::unavailable();
        let failed = ModelAnalysis::failed();
        assert_ne!(unavailable.suggestions, failed.suggestions);
        assert_eq!(unavailable.suggestions.len(), 3);
        assert_eq!(failed.suggestions.len(), 3);
        assert!(unavailable.is_fallback());
        assert!(failed.is_fallback());
    }

    #[test]
    fn test_origin_is_not_persisted() {
        let analysis = ModelAnalysis::generated("text".to_string(), vec!["a".to_string()]);
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(!json.contains("origin"));

        let back: ModelAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back.origin, AnalysisOrigin::Cached);
        assert_eq!(back.suggestions, analysis.suggestions);
    }

    #[test]
    fn test_default_generation_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens, 200);
        assert_eq!(params.n, 1);
        assert!((params.temperature - 0.5).abs() < f32::EPSILON);
    }
}
