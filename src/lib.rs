//! Context-window resolution for hosted and self-hosted LLM providers
//!
//! Given a provider and a model name, [`ContextWindowResolver`] answers how
//! many tokens the model accepts:
//! - hosted models come from a compiled-in catalog with shorthand aliases
//! - self-hosted models are inspected over HTTP, preferring an explicit
//!   `num_ctx` override to the model's trained context length
//!
//! Results are cached for the life of the process. The [`context::tokens`]
//! module adds a fixed-ratio token/character conversion used to split long
//! text into provider-sized chunks.

pub mod config;
pub mod context;
pub mod error;
pub mod inspector;
pub mod logging;
pub mod metrics;
pub mod models;

pub use crate::config::{Config, LoggingConfig};
pub use context::{
    chars_to_tokens, chunkify, tokens_to_chars, ContextWindowResolver, ResolutionCache,
};
pub use error::{ContextWindowError, Result};
pub use inspector::{InspectorConfig, ModelDescriptor, ModelInspector, SelfHostedClient};
pub use models::{detect_self_hosted, ModelCatalog, ModelRecord, Provider};
