//! Error types for context-window resolution

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ContextWindowError>;

/// Everything that can go wrong while resolving a context window
#[derive(Debug, Error)]
pub enum ContextWindowError {
    /// Transport failure or non-success status from the self-hosted server
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),

    /// The server answered 2xx but the body was not what we expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No models available for provider detection")]
    NoModelsAvailable,

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Context window unavailable for model: {0}")]
    ContextWindowUnavailable(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Model name must not be empty")]
    InvalidModelName,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ContextWindowError {
    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RemoteFetch(_) => "remote_fetch",
            Self::InvalidResponse(_) => "invalid_response",
            Self::NoModelsAvailable => "no_models",
            Self::UnknownModel(_) => "unknown_model",
            Self::ContextWindowUnavailable(_) => "unavailable",
            Self::UnsupportedProvider(_) => "unsupported_provider",
            Self::InvalidModelName => "invalid_model_name",
            Self::Configuration(_) => "configuration",
        }
    }
}

impl From<::config::ConfigError> for ContextWindowError {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Configuration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContextWindowError::UnknownModel("not-a-real-model".to_string());
        assert_eq!(err.to_string(), "Unknown model: not-a-real-model");

        let err = ContextWindowError::NoModelsAvailable;
        assert_eq!(err.to_string(), "No models available for provider detection");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(ContextWindowError::RemoteFetch("x".into()).kind(), "remote_fetch");
        assert_eq!(
            ContextWindowError::ContextWindowUnavailable("m".into()).kind(),
            "unavailable"
        );
    }
}
