//! Context-window resolution across providers
//!
//! Lookup order:
//! 1. resolution cache (no further work on a hit)
//! 2. hosted: alias table, then dated catalog, else `UnknownModel`
//! 3. self-hosted: `PARAMETER num_ctx` override in the modelfile, then the
//!    first `*.context_length` metadata key, else `ContextWindowUnavailable`
//!
//! A cached value is never re-checked, so an override added on the server
//! after the first resolution is not seen until the process restarts.

use super::cache::ResolutionCache;
use crate::error::{ContextWindowError, Result};
use crate::inspector::{ModelInspector, SelfHostedClient};
use crate::metrics::METRICS;
use crate::models::{ModelCatalog, Provider};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves the usable context window of a model
pub struct ContextWindowResolver {
    catalog: ModelCatalog,
    inspector: Arc<dyn ModelInspector>,
    cache: Arc<ResolutionCache>,
}

impl ContextWindowResolver {
    /// Create a resolver backed by the process-wide cache
    pub fn new(catalog: ModelCatalog, inspector: Arc<dyn ModelInspector>) -> Self {
        Self::with_cache(catalog, inspector, ResolutionCache::global())
    }

    /// Create a resolver with its own cache
    pub fn with_cache(
        catalog: ModelCatalog,
        inspector: Arc<dyn ModelInspector>,
        cache: Arc<ResolutionCache>,
    ) -> Self {
        Self {
            catalog,
            inspector,
            cache,
        }
    }

    /// Built-in catalog and an HTTP inspector configured from the environment
    pub fn from_env() -> Result<Self> {
        let client = SelfHostedClient::from_env()?;
        Ok(Self::new(ModelCatalog::builtin(), Arc::new(client)))
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Context window of `model_name` in tokens.
    ///
    /// `endpoint` is only used for self-hosted models.
    pub async fn get_context_window(
        &self,
        provider: Provider,
        endpoint: &str,
        model_name: &str,
    ) -> Result<u64> {
        if let Some(cached) = self.cache.try_get(provider, model_name) {
            debug!("Cache hit: provider={}, model={}", provider, model_name);
            METRICS.record_resolution(provider.as_str(), "cache");
            return Ok(cached);
        }

        let resolved = match provider {
            Provider::Hosted => self.resolve_hosted(model_name),
            Provider::SelfHosted => self.resolve_self_hosted(endpoint, model_name).await,
        };

        match resolved {
            Ok((window, source)) => {
                self.cache.put(provider, model_name, window);
                METRICS.record_resolution(provider.as_str(), source);
                info!(
                    "Resolved context window: provider={}, model={}, tokens={}, source={}",
                    provider, model_name, window, source
                );
                Ok(window)
            }
            Err(e) => {
                METRICS.record_resolution_error(provider.as_str(), e.kind());
                Err(e)
            }
        }
    }

    /// `get_context_window` for string-typed provider tags
    pub async fn get_context_window_tagged(
        &self,
        provider: &str,
        endpoint: &str,
        model_name: &str,
    ) -> Result<u64> {
        let provider: Provider = provider.parse()?;
        self.get_context_window(provider, endpoint, model_name).await
    }

    /// Hosted lookup; pure computation, no I/O
    fn resolve_hosted(&self, model_name: &str) -> Result<(u64, &'static str)> {
        self.catalog
            .lookup(model_name)
            .map(|(window, source)| (window, source.as_str()))
            .ok_or_else(|| ContextWindowError::UnknownModel(model_name.to_string()))
    }

    async fn resolve_self_hosted(
        &self,
        endpoint: &str,
        model_name: &str,
    ) -> Result<(u64, &'static str)> {
        let descriptor = self
            .inspector
            .fetch_model_info(endpoint, model_name, true)
            .await?;

        // An administrator-pinned window beats the trained default.
        if let Some(window) = descriptor.num_ctx_override() {
            return Ok((window, "override"));
        }

        descriptor
            .metadata_context_length()
            .map(|window| (window, "metadata"))
            .ok_or_else(|| ContextWindowError::ContextWindowUnavailable(model_name.to_string()))
    }
}
