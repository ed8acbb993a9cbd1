//! Layered configuration
//!
//! Sources, lowest precedence first:
//! - `.env` in the working directory (loaded into the environment)
//! - an optional TOML file
//! - `CONTEXT_WINDOW_*` environment variables, `__` between nested keys
//!   (e.g. `CONTEXT_WINDOW_INSPECTOR__ENDPOINT`)

use crate::context::ContextWindowResolver;
use crate::error::Result;
use crate::inspector::{InspectorConfig, SelfHostedClient};
use crate::models::{CatalogConfig, ModelCatalog};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const ENV_PREFIX: &str = "CONTEXT_WINDOW";

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inspector: InspectorConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load from `.env`, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }

        let config = builder
            .add_source(env_source())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Parse a TOML document, still honouring environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Catalog with configured entries layered over the built-in tables
    pub fn catalog(&self) -> Result<ModelCatalog> {
        ModelCatalog::with_overrides(&self.catalog)
    }

    /// Resolver over the configured catalog and HTTP client, sharing the
    /// process-wide cache
    pub fn into_resolver(self) -> Result<ContextWindowResolver> {
        let catalog = self.catalog()?;
        let client = SelfHostedClient::new(self.inspector)?;
        Ok(ContextWindowResolver::new(catalog, Arc::new(client)))
    }
}

fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.inspector.endpoint, "http://localhost:11434");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(config.catalog.models.is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
            [inspector]
            endpoint = "http://gpu-box:11434"
            timeout_ms = 1500

            [logging]
            level = "debug"
            json = true

            [[catalog.models]]
            id = "gpt-5-2025-08-07"
            context_window = 400000

            [[catalog.aliases]]
            alias = "gpt-5"
            target = "gpt-5-2025-08-07"
            "#,
        )
        .unwrap();

        assert_eq!(config.inspector.endpoint, "http://gpu-box:11434");
        assert_eq!(config.inspector.timeout_ms, 1500);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.lookup("gpt-5").map(|(w, _)| w), Some(400_000));
        assert_eq!(catalog.lookup("gpt-4o").map(|(w, _)| w), Some(128_000));
    }

    #[test]
    fn test_dangling_alias_in_file() {
        let config = Config::from_toml_str(
            r#"
            [[catalog.aliases]]
            alias = "latest"
            target = "does-not-exist"
            "#,
        )
        .unwrap();
        assert!(config.catalog().is_err());
    }

    #[test]
    fn test_into_resolver() {
        let resolver = Config::default().into_resolver();
        assert!(resolver.is_ok());
    }
}
