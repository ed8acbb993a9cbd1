//! HTTP client for the self-hosted model server

use super::config::InspectorConfig;
use super::{ModelDescriptor, ModelInspector, SHOW_PATH};
use crate::error::{ContextWindowError, Result};
use crate::metrics::METRICS;
use crate::models::ModelRecord;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error};

/// Relative path of the OpenAI-compatible model listing
pub const MODELS_PATH: &str = "/v1/models";

/// Self-hosted model server client
pub struct SelfHostedClient {
    http: Client,
    config: InspectorConfig,
}

impl SelfHostedClient {
    /// Create a new client
    pub fn new(config: InspectorConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ContextWindowError::Configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Default endpoint, honouring environment overrides
    pub fn from_env() -> Result<Self> {
        Self::new(InspectorConfig::default().from_env())
    }

    /// Configured base address
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Show a model using the configured endpoint
    pub async fn show(&self, model_name: &str, verbose: bool) -> Result<ModelDescriptor> {
        self.fetch_model_info(&self.config.endpoint, model_name, verbose)
            .await
    }

    /// List the models the server exposes, in server order
    pub async fn list_models(&self, endpoint: &str) -> Result<Vec<ModelRecord>> {
        let start = Instant::now();
        let url = join_url(endpoint, MODELS_PATH);
        debug!("Listing models: {}", url);

        let response = self.send(self.http.get(&url), "list").await?;
        let listing: ModelListResponse = response.json().await.map_err(|e| {
            METRICS.record_request("list", "invalid");
            ContextWindowError::InvalidResponse(e.to_string())
        })?;

        METRICS.record_request("list", "success");
        METRICS.observe_request_duration("list", start.elapsed().as_secs_f64());

        Ok(listing.data)
    }

    async fn send(&self, mut req: RequestBuilder, operation: &str) -> Result<Response> {
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            METRICS.record_request(operation, "error");
            if e.is_timeout() {
                ContextWindowError::RemoteFetch(format!("timeout: {}", e))
            } else {
                ContextWindowError::RemoteFetch(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            METRICS.record_request(operation, "error");
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("{} request failed with status {}", operation, status);
            return Err(ContextWindowError::RemoteFetch(format!(
                "Status {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ModelInspector for SelfHostedClient {
    async fn fetch_model_info(
        &self,
        endpoint: &str,
        model_name: &str,
        verbose: bool,
    ) -> Result<ModelDescriptor> {
        if model_name.is_empty() {
            return Err(ContextWindowError::InvalidModelName);
        }

        let start = Instant::now();
        let url = join_url(endpoint, SHOW_PATH);
        let request_body = serde_json::json!({
            "name": model_name,
            "verbose": verbose
        });

        debug!("Calling show API: model={}, verbose={}", model_name, verbose);

        let response = self
            .send(self.http.post(&url).json(&request_body), "show")
            .await?;

        let body: serde_json::Value = response.json().await.map_err(|e| {
            METRICS.record_request("show", "invalid");
            ContextWindowError::InvalidResponse(e.to_string())
        })?;
        let descriptor = ModelDescriptor::from_value(body)?;

        METRICS.record_request("show", "success");
        METRICS.observe_request_duration("show", start.elapsed().as_secs_f64());

        Ok(descriptor)
    }
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    data: Vec<ModelRecord>,
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:11434/", SHOW_PATH),
            "http://localhost:11434/api/show"
        );
        assert_eq!(
            join_url("http://gpu-box:8080", MODELS_PATH),
            "http://gpu-box:8080/v1/models"
        );
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = SelfHostedClient::new(InspectorConfig::default());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().endpoint(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_empty_model_name_rejected() {
        let client = SelfHostedClient::new(InspectorConfig::default()).unwrap();
        let result = client.fetch_model_info("http://localhost:11434", "", true).await;
        assert!(matches!(result, Err(ContextWindowError::InvalidModelName)));
    }
}
