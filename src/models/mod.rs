//! Provider tags, model records and provider detection

pub mod catalog;

pub use catalog::{AliasEntry, CatalogConfig, CatalogEntry, CatalogSource, ModelCatalog};

use crate::error::{ContextWindowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribution value the self-hosted server puts on every model it lists
pub const SELF_HOSTED_OWNER: &str = "library";

/// Which provider a model lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Hosted API with a fixed, versioned catalog
    Hosted,
    /// Self-hosted model server queried over HTTP
    SelfHosted,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Hosted => "hosted",
            Provider::SelfHosted => "self_hosted",
        }
    }

    /// Infer the provider from a previously fetched model list
    pub fn detect(models: &[ModelRecord]) -> Result<Self> {
        if detect_self_hosted(models)? {
            Ok(Provider::SelfHosted)
        } else {
            Ok(Provider::Hosted)
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ContextWindowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hosted" | "openai" => Ok(Provider::Hosted),
            "self_hosted" | "self-hosted" | "ollama" => Ok(Provider::SelfHosted),
            other => Err(ContextWindowError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// One entry of a model listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub owned_by: String,
}

impl ModelRecord {
    pub fn new(id: impl Into<String>, owned_by: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owned_by: owned_by.into(),
        }
    }
}

/// True when the list came from the self-hosted server.
///
/// Only the first record is inspected; an empty list is an error because
/// there is nothing to infer from.
pub fn detect_self_hosted(models: &[ModelRecord]) -> Result<bool> {
    let first = models.first().ok_or(ContextWindowError::NoModelsAvailable)?;
    Ok(first.owned_by == SELF_HOSTED_OWNER)
}
