//! Process-wide cache of resolved context windows
//!
//! Entries never expire and the map is unbounded; it lives as long as the
//! process does.

use crate::error::Result;
use crate::metrics::METRICS;
use crate::models::Provider;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static GLOBAL_CACHE: Lazy<Arc<ResolutionCache>> = Lazy::new(|| {
    Arc::new(ResolutionCache {
        entries: DashMap::new(),
        report_metrics: true,
    })
});

/// Cache key combining provider and model name
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    provider: Provider,
    model_name: String,
}

impl CacheKey {
    fn new(provider: Provider, model_name: &str) -> Self {
        Self {
            provider,
            model_name: model_name.to_string(),
        }
    }
}

/// (provider, model) -> context window
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<CacheKey, u64>,
    // Only the process-wide instance feeds the cache gauge
    report_metrics: bool,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every resolver in the process
    pub fn global() -> Arc<ResolutionCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    pub fn try_get(&self, provider: Provider, model_name: &str) -> Option<u64> {
        self.entries
            .get(&CacheKey::new(provider, model_name))
            .map(|entry| *entry)
    }

    /// Repeated puts for one key are accepted; the last one wins
    pub fn put(&self, provider: Provider, model_name: &str, context_window: u64) {
        self.entries
            .insert(CacheKey::new(provider, model_name), context_window);
        if self.report_metrics {
            METRICS.set_cache_entries(self.entries.len());
        }
    }

    /// `try_get` for string-typed provider tags
    pub fn try_get_tagged(&self, provider: &str, model_name: &str) -> Result<Option<u64>> {
        let provider: Provider = provider.parse()?;
        Ok(self.try_get(provider, model_name))
    }

    /// `put` for string-typed provider tags
    pub fn put_tagged(&self, provider: &str, model_name: &str, context_window: u64) -> Result<()> {
        let provider: Provider = provider.parse()?;
        self.put(provider, model_name, context_window);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextWindowError;

    #[test]
    fn test_cache_store_and_get() {
        let cache = ResolutionCache::new();
        assert!(cache.try_get(Provider::Hosted, "gpt-4o").is_none());

        cache.put(Provider::Hosted, "gpt-4o", 128_000);
        assert_eq!(cache.try_get(Provider::Hosted, "gpt-4o"), Some(128_000));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_partitioned_by_provider() {
        let cache = ResolutionCache::new();
        cache.put(Provider::SelfHosted, "llama3", 8192);

        assert!(cache.try_get(Provider::Hosted, "llama3").is_none());
        assert_eq!(cache.try_get(Provider::SelfHosted, "llama3"), Some(8192));
    }

    #[test]
    fn test_repeated_put_last_wins() {
        let cache = ResolutionCache::new();
        cache.put(Provider::SelfHosted, "llama3", 8192);
        cache.put(Provider::SelfHosted, "llama3", 4096);

        assert_eq!(cache.try_get(Provider::SelfHosted, "llama3"), Some(4096));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_tagged_rejects_unknown_provider() {
        let cache = ResolutionCache::new();

        let result = cache.put_tagged("anthropic", "claude", 200_000);
        assert!(matches!(result, Err(ContextWindowError::UnsupportedProvider(_))));
        assert!(cache.is_empty());

        let result = cache.try_get_tagged("anthropic", "claude");
        assert!(matches!(result, Err(ContextWindowError::UnsupportedProvider(_))));
    }

    #[test]
    fn test_only_global_cache_reports_size() {
        let local = ResolutionCache::new();
        let before = METRICS.cache_entries.get();
        for i in 0..5 {
            local.put(Provider::SelfHosted, &format!("local-model-{}", i), 1024);
        }
        assert_eq!(METRICS.cache_entries.get(), before);

        let global = ResolutionCache::global();
        global.put(Provider::SelfHosted, "gauge-check-model", 2048);
        assert_eq!(METRICS.cache_entries.get(), global.len() as f64);
    }

    #[test]
    fn test_tagged_round_trip() {
        let cache = ResolutionCache::new();
        cache.put_tagged("ollama", "mistral", 32_768).unwrap();
        assert_eq!(cache.try_get_tagged("self_hosted", "mistral").unwrap(), Some(32_768));
    }
}
