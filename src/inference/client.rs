//! Inference client trait and its HTTP implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::error::InferenceError;
use super::request::InferenceRequest;
use crate::config::ApiKey;

/// Sends one prompt to a language model and returns its parsed response.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Sends `request` and returns the response body as untyped JSON.
    ///
    /// # Errors
    /// - If the endpoint cannot be reached or the request times out
    /// - If the endpoint answers with a non-success status
    /// - If the response body is not valid JSON
    async fn infer(&self, request: &InferenceRequest) -> Result<Value, InferenceError>;
}

/// Bearer-authenticated JSON client for a hosted inference endpoint.
pub struct HttpInferenceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
}

impl HttpInferenceClient {
    /// Creates a client for `endpoint`.
    ///
    /// `timeout` bounds the whole request, connection included.
    ///
    /// # Errors
    /// - If the underlying HTTP client cannot be constructed
    pub fn new(
        endpoint: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Request(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn infer(&self, request: &InferenceRequest) -> Result<Value, InferenceError> {
        tracing::debug!(
            "Inference API Call:\n  URL: {}\n  Method: POST\n  Headers:\n    Authorization: Bearer <redacted>\n    Content-Type: application/json\n  Parameters: max_length={}, temperature={}",
            self.endpoint,
            request.parameters.max_length,
            request.parameters.temperature
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Inference endpoint returned {status}: {body}");
            return Err(InferenceError::from_status(status, &body));
        }

        let bytes = response.bytes().await?;
        let result: Value = serde_json::from_slice(&bytes)
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        tracing::debug!(
            "Inference API Response:\n  Status: {}\n  Body length: {} bytes\n  Full response: {:#}",
            status,
            bytes.len(),
            result
        );

        Ok(result)
    }
}
