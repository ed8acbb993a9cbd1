//! Hosted-provider model catalog and alias table
//!
//! The built-in tables cover the dated releases of the hosted API together
//! with the shorthand names that currently point at them. Both tables can be
//! extended or overridden from configuration, so a new release only needs a
//! data update.

use crate::error::{ContextWindowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUILTIN_MODELS: &[(&str, u64)] = &[
    ("gpt-4o-2024-11-20", 128_000),
    ("gpt-4o-2024-08-06", 128_000),
    ("gpt-4o-2024-05-13", 128_000),
    ("gpt-4o-mini-2024-07-18", 128_000),
    ("chatgpt-4o-latest", 128_000),
    ("gpt-4-turbo-2024-04-09", 128_000),
    ("gpt-4-0125-preview", 128_000),
    ("gpt-4-1106-preview", 128_000),
    ("gpt-4-0613", 8_192),
    ("gpt-4-32k-0613", 32_768),
    ("gpt-3.5-turbo-0125", 16_385),
    ("gpt-3.5-turbo-1106", 16_385),
    ("o1-2024-12-17", 200_000),
    ("o1-mini-2024-09-12", 128_000),
    ("o1-preview-2024-09-12", 128_000),
    ("o3-mini-2025-01-31", 200_000),
];

// Must be updated by hand when the provider rotates its defaults.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("gpt-4o", "gpt-4o-2024-08-06"),
    ("gpt-4o-mini", "gpt-4o-mini-2024-07-18"),
    ("gpt-4-turbo", "gpt-4-turbo-2024-04-09"),
    ("gpt-4-turbo-preview", "gpt-4-0125-preview"),
    ("gpt-4", "gpt-4-0613"),
    ("gpt-4-32k", "gpt-4-32k-0613"),
    ("gpt-3.5-turbo", "gpt-3.5-turbo-0125"),
    ("o1", "o1-2024-12-17"),
    ("o1-mini", "o1-mini-2024-09-12"),
    ("o1-preview", "o1-preview-2024-09-12"),
    ("o3-mini", "o3-mini-2025-01-31"),
];

/// A dated catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub context_window: u64,
}

/// A shorthand name pointing at a dated entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    pub target: String,
}

/// Catalog additions loaded from configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub models: Vec<CatalogEntry>,
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
}

/// Which table answered a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Alias,
    Catalog,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Alias => "alias",
            CatalogSource::Catalog => "catalog",
        }
    }
}

/// Immutable catalog + alias table for the hosted provider
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: HashMap<String, u64>,
    aliases: HashMap<String, String>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting aliases that point nowhere
    pub fn new(
        models: impl IntoIterator<Item = CatalogEntry>,
        aliases: impl IntoIterator<Item = AliasEntry>,
    ) -> Result<Self> {
        let catalog = Self {
            models: models
                .into_iter()
                .map(|e| (e.id, e.context_window))
                .collect(),
            aliases: aliases.into_iter().map(|a| (a.alias, a.target)).collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The compiled-in tables
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN_MODELS
                .iter()
                .map(|(id, window)| (id.to_string(), *window))
                .collect(),
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, target)| (alias.to_string(), target.to_string()))
                .collect(),
        }
    }

    /// Built-in tables with configured entries layered on top
    pub fn with_overrides(config: &CatalogConfig) -> Result<Self> {
        let mut catalog = Self::builtin();
        for entry in &config.models {
            catalog.models.insert(entry.id.clone(), entry.context_window);
        }
        for entry in &config.aliases {
            catalog.aliases.insert(entry.alias.clone(), entry.target.clone());
        }
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        for (id, window) in &self.models {
            if *window == 0 {
                return Err(ContextWindowError::Configuration(format!(
                    "catalog entry '{}' has a zero context window",
                    id
                )));
            }
        }
        for (alias, target) in &self.aliases {
            if !self.models.contains_key(target) {
                return Err(ContextWindowError::Configuration(format!(
                    "alias '{}' points at unknown model '{}'",
                    alias, target
                )));
            }
        }
        Ok(())
    }

    /// Alias table first, then the dated catalog
    pub fn lookup(&self, model_name: &str) -> Option<(u64, CatalogSource)> {
        if let Some(window) = self
            .aliases
            .get(model_name)
            .and_then(|target| self.models.get(target))
        {
            return Some((*window, CatalogSource::Alias));
        }

        self.models
            .get(model_name)
            .map(|window| (*window, CatalogSource::Catalog))
    }

    pub fn contains(&self, model_name: &str) -> bool {
        self.lookup(model_name).is_some()
    }

    /// Dated identifier an alias currently points at
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
