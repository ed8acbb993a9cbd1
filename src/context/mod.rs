//! Context-window resolution, caching and token/character conversion

pub mod cache;
pub mod resolver;
pub mod tokens;

pub use cache::ResolutionCache;
pub use resolver::ContextWindowResolver;
pub use tokens::{chars_to_tokens, chunkify, tokens_to_chars, CharRatioEstimator, TokenEstimator};
