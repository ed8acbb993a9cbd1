//! Self-hosted model server introspection
//!
//! The server's "show" operation returns an opaque JSON object. Two fields
//! matter for context-window resolution:
//! - `modelfile`: free text that may pin `PARAMETER num_ctx <n>`
//! - `model_info`: flat object with family-prefixed keys such as
//!   `llama.context_length`

pub mod client;
pub mod config;

pub use client::SelfHostedClient;
pub use config::InspectorConfig;

use crate::error::{ContextWindowError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

/// Relative path of the "show model" operation
pub const SHOW_PATH: &str = "/api/show";

/// Suffix of the metadata key carrying the trained context length
pub const CONTEXT_LENGTH_SUFFIX: &str = ".context_length";

static NUM_CTX_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    // Whole-line directive only; commented or inline mentions do not count.
    Regex::new(r"(?im)^[ \t]*PARAMETER[ \t]+num_ctx[ \t]+(\d+)[ \t]*\r?$")
        .expect("num_ctx pattern is valid")
});

/// Fetches model metadata from a self-hosted server
#[async_trait]
pub trait ModelInspector: Send + Sync {
    /// POST `{endpoint}/api/show` for one model
    async fn fetch_model_info(
        &self,
        endpoint: &str,
        model_name: &str,
        verbose: bool,
    ) -> Result<ModelDescriptor>;
}

/// Raw key/value description of one model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDescriptor {
    fields: Map<String, Value>,
}

impl ModelDescriptor {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a decoded response body; anything but an object is rejected
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ContextWindowError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Free-text configuration blob
    pub fn modelfile(&self) -> Option<&str> {
        self.fields.get("modelfile").and_then(Value::as_str)
    }

    /// Nested metadata object
    pub fn model_info(&self) -> Option<&Map<String, Value>> {
        self.fields.get("model_info").and_then(Value::as_object)
    }

    /// Window pinned by a `PARAMETER num_ctx <n>` directive, if any
    pub fn num_ctx_override(&self) -> Option<u64> {
        let modelfile = self.modelfile().filter(|m| !m.is_empty())?;
        NUM_CTX_DIRECTIVE
            .captures(modelfile)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// First `*.context_length` metadata value that parses as an integer
    pub fn metadata_context_length(&self) -> Option<u64> {
        let info = self.model_info()?;
        find_value(info, |key| key.ends_with(CONTEXT_LENGTH_SUFFIX)).find_map(|(key, value)| {
            let parsed = parse_integer(value);
            if parsed.is_none() {
                warn!("Ignoring non-integer metadata value for {}: {}", key, value);
            }
            parsed
        })
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

/// Immediate entries of `map` whose key satisfies `predicate`
pub fn find_value<'a, P>(
    map: &'a Map<String, Value>,
    predicate: P,
) -> impl Iterator<Item = (&'a String, &'a Value)>
where
    P: Fn(&str) -> bool + 'a,
{
    map.iter().filter(move |(key, _)| predicate(key))
}

/// Accepts JSON integers, integral floats and numeric strings
fn parse_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> ModelDescriptor {
        ModelDescriptor::from_value(value).unwrap()
    }

    #[test]
    fn test_num_ctx_override() {
        let d = descriptor(json!({
            "modelfile": "FROM llama3\nPARAMETER num_ctx 4096\nPARAMETER stop \"<|eot_id|>\""
        }));
        assert_eq!(d.num_ctx_override(), Some(4096));
    }

    #[test]
    fn test_num_ctx_override_case_insensitive() {
        let d = descriptor(json!({ "modelfile": "parameter NUM_CTX 2048" }));
        assert_eq!(d.num_ctx_override(), Some(2048));
    }

    #[test]
    fn test_no_override_in_empty_modelfile() {
        let d = descriptor(json!({ "modelfile": "" }));
        assert_eq!(d.num_ctx_override(), None);

        let d = descriptor(json!({ "modelfile": "PARAMETER temperature 0.2" }));
        assert_eq!(d.num_ctx_override(), None);
    }

    #[test]
    fn test_metadata_context_length_string_and_number() {
        let d = descriptor(json!({ "model_info": { "llama.context_length": "8192" } }));
        assert_eq!(d.metadata_context_length(), Some(8192));

        let d = descriptor(json!({ "model_info": { "qwen2.context_length": 32768 } }));
        assert_eq!(d.metadata_context_length(), Some(32768));
    }

    #[test]
    fn test_commented_directive_ignored() {
        let d = descriptor(json!({
            "modelfile": "# PARAMETER num_ctx 2048 was too small\nFROM llama3\n",
            "model_info": { "llama.context_length": 8192 }
        }));
        assert_eq!(d.num_ctx_override(), None);
        assert_eq!(d.metadata_context_length(), Some(8192));
    }

    #[test]
    fn test_directive_inside_system_prompt_ignored() {
        let d = descriptor(json!({
            "modelfile": "FROM llama3\nSYSTEM \"\"\"set PARAMETER num_ctx 1 for fun\"\"\"\n"
        }));
        assert_eq!(d.num_ctx_override(), None);
    }

    #[test]
    fn test_directive_with_trailing_garbage_ignored() {
        let d = descriptor(json!({ "modelfile": "PARAMETER num_ctx 4096abc\n" }));
        assert_eq!(d.num_ctx_override(), None);
    }

    #[test]
    fn test_indented_directive_with_crlf() {
        let d = descriptor(json!({ "modelfile": "FROM llama3\r\n  PARAMETER num_ctx 6144\r\n" }));
        assert_eq!(d.num_ctx_override(), Some(6144));
    }

    #[test]
    fn test_metadata_integral_float() {
        let d = descriptor(json!({ "model_info": { "llama.context_length": 8192.0 } }));
        assert_eq!(d.metadata_context_length(), Some(8192));

        let d = descriptor(json!({ "model_info": { "llama.context_length": 8192.5 } }));
        assert_eq!(d.metadata_context_length(), None);
    }

    #[test]
    fn test_metadata_requires_suffix() {
        let d = descriptor(json!({
            "model_info": {
                "context_length": 1000,
                "llama.context_length_extra": 2000,
                "llama.embedding_length": 4096
            }
        }));
        assert_eq!(d.metadata_context_length(), None);
    }

    #[test]
    fn test_metadata_skips_unparseable_values() {
        let d = descriptor(json!({
            "model_info": {
                "a.context_length": "unknown",
                "b.context_length": 16384
            }
        }));
        assert_eq!(d.metadata_context_length(), Some(16384));
    }

    #[test]
    fn test_non_object_rejected() {
        let result = ModelDescriptor::from_value(json!(["not", "an", "object"]));
        assert!(matches!(result, Err(ContextWindowError::InvalidResponse(_))));
    }
}
