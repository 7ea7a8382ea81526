//! Lazy, cached access to a text-generation model.

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;

use super::prompt::{analysis_section, build_prompt, extract_suggestions};
use super::{
    cache_key, GenerationParams, HttpGenerator, ModelAnalysis, ModelCache, ModelError,
    TextGenerator,
};

type Loader = Box<dyn Fn() -> Result<Box<dyn TextGenerator>, ModelError> + Send + Sync>;

/// Acquires the model on first use and memoizes its answers on disk.
///
/// Acquisition is attempted exactly once. If it fails, every call returns
/// the "not available" payload without touching the cache.
pub struct ModelAdapter {
    loader: Loader,
    generator: OnceCell<Option<Box<dyn TextGenerator>>>,
    cache: Option<ModelCache>,
    params: GenerationParams,
}

impl ModelAdapter {
    /// Create an adapter that acquires its model through `loader`.
    pub fn with_loader<F>(loader: F, cache: Option<ModelCache>) -> Self
    where
        F: Fn() -> Result<Box<dyn TextGenerator>, ModelError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            generator: OnceCell::new(),
            cache,
            params: GenerationParams::default(),
        }
    }

    /// An adapter with no model at all.
    pub fn unavailable() -> Self {
        Self::with_loader(
            || Err(ModelError::Unavailable("model disabled".to_string())),
            None,
        )
    }

    /// Build an adapter from configuration.
    ///
    /// A disabled model or a missing endpoint makes the model unavailable.
    pub fn from_config(config: &ModelConfig) -> Self {
        if !config.enabled {
            return Self::unavailable();
        }

        let cache = ModelCache::from_dir(config.cache_dir.as_deref());
        let endpoint = config.endpoint.clone();
        let name = config.name.clone();
        let api_key = config.api_key.clone();

        Self::with_loader(
            move || {
                let endpoint = endpoint
                    .clone()
                    .ok_or_else(|| ModelError::Unavailable("no model endpoint configured".to_string()))?;
                let generator = HttpGenerator::new(endpoint, name.clone(), api_key.clone())?;
                Ok(Box::new(generator) as Box<dyn TextGenerator>)
            },
            cache,
        )
    }

    /// Override the decoding parameters.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    fn generator(&self) -> Option<&dyn TextGenerator> {
        self.generator
            .get_or_init(|| match (self.loader)() {
                Ok(generator) => {
                    info!("text generation model acquired");
                    Some(generator)
                }
                Err(e) => {
                    warn!(error = %e, "text generation model unavailable, using rule-based analysis only");
                    None
                }
            })
            .as_deref()
    }

    /// Whether a model could be acquired. Triggers acquisition.
    pub fn is_available(&self) -> bool {
        self.generator().is_some()
    }

    /// Analyze a code snippet. Never fails.
    pub fn analyze(&self, snippet: &str) -> ModelAnalysis {
        let Some(generator) = self.generator() else {
            return ModelAnalysis::unavailable();
        };

        let key = cache_key(snippet);
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            debug!(key = %key, "model cache hit");
            return cached;
        }
        debug!(key = %key, "model cache miss");

        let generated = match generator.generate(&build_prompt(snippet), &self.params) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "model analysis failed");
                return ModelAnalysis::failed();
            }
        };

        let section = analysis_section(&generated);
        let analysis = ModelAnalysis::generated(section.to_string(), extract_suggestions(section));

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &analysis) {
                warn!(error = %e, "could not cache model analysis");
            }
        }

        analysis
    }
}
