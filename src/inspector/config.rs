//! Configuration for the self-hosted model server client

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Self-hosted client configuration
#[derive(Debug, Deserialize)]
pub struct InspectorConfig {
    /// Base address of the model server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token for servers sitting behind an authenticating proxy
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

fn default_endpoint() -> String { "http://localhost:11434".to_string() }
fn default_timeout_ms() -> u64 { 30_000 }

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
        }
    }
}

impl InspectorConfig {
    /// Apply the server's conventional environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("OLLAMA_HOST") {
            self.endpoint = normalize_host(&val);
        }

        if let Ok(val) = std::env::var("OLLAMA_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("OLLAMA_API_KEY") {
            if !val.is_empty() {
                self.api_key = Some(SecretString::new(val));
            }
        }

        self
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// `OLLAMA_HOST` is often given as bare `host:port`
fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
