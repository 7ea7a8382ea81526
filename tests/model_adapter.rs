//! Integration tests for the model adapter and its response cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use trucode::model::{
    cache_key, AnalysisOrigin, GenerationParams, ModelAdapter, ModelAnalysis, ModelCache,
    ModelError, TextGenerator,
};

/// Mock generator that counts invocations.
struct Counting {
    calls: Arc<AtomicUsize>,
}

impl TextGenerator for Counting {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(prompt.ends_with("Analysis:\n"));
        assert_eq!(params.max_tokens, 200);
        Ok(format!(
            "{}\nThe code is short.\n- Name the magic number\n- Add a docstring\nYou could add tests\n- Extra point",
            prompt
        ))
    }
}

fn counting_adapter(cache: Option<ModelCache>) -> (ModelAdapter, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let adapter = ModelAdapter::with_loader(
        move || {
            Ok(Box::new(Counting {
                calls: Arc::clone(&counter),
            }) as Box<dyn TextGenerator>)
        },
        cache,
    );
    (adapter, calls)
}

#[test]
fn test_unavailable_model_never_touches_cache() {
    let temp = TempDir::new().unwrap();
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let adapter = ModelAdapter::with_loader(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ModelError::Unavailable("no capability".to_string()))
        },
        Some(ModelCache::new(temp.path())),
    );

    let first = adapter.analyze("x = 1");
    let second = adapter.analyze("y = 2");
    assert_eq!(first, ModelAnalysis::unavailable());
    assert_eq!(second, ModelAnalysis::unavailable());
    assert_eq!(first.description, "Basic code analysis (AI model not available)");
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_shared_prefix_is_served_from_cache() {
    let temp = TempDir::new().unwrap();
    let (adapter, calls) = counting_adapter(Some(ModelCache::new(temp.path())));

    let prefix = "#".repeat(100);
    let first = adapter.analyze(&format!("{}\nprint(1)", prefix));
    let second = adapter.analyze(&format!("{}\nprint(2)", prefix));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.origin, AnalysisOrigin::Generated);
    assert_eq!(second.origin, AnalysisOrigin::Cached);
    assert_eq!(first.suggestions, second.suggestions);
    assert_eq!(
        first.suggestions,
        vec!["Name the magic number", "Add a docstring", "You could add tests"]
    );

    let key = cache_key(&prefix);
    assert!(temp
        .path()
        .join(format!("analysis_{}.json", key))
        .is_file());
}

#[test]
fn test_cache_survives_new_adapter() {
    let temp = TempDir::new().unwrap();
    let (first_adapter, first_calls) = counting_adapter(Some(ModelCache::new(temp.path())));
    first_adapter.analyze("value = compute()");

    let (second_adapter, second_calls) = counting_adapter(Some(ModelCache::new(temp.path())));
    let cached = second_adapter.analyze("value = compute()");

    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    assert_eq!(cached.origin, AnalysisOrigin::Cached);
    assert_eq!(cached.description, "AI-powered code analysis");
}

#[test]
fn test_without_cache_every_call_generates() {
    let (adapter, calls) = counting_adapter(None);
    adapter.analyze("a = 1");
    adapter.analyze("a = 1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
