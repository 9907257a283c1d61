//! HTTP client for a running translation server

use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{TranslationRequest, TranslationResult};

/// Async client for the `/translate` endpoints
#[derive(Debug, Clone)]
pub struct TranslationClient {
    client: reqwest::Client,
    base_url: String,
}

impl TranslationClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Translate through `POST /translate`
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let response = self.send("/translate", request).await?;
        let result = response
            .json::<TranslationResult>()
            .await
            .map_err(|e| TranslationError::InternalError(format!("invalid response: {}", e)))?;
        Ok(result)
    }

    /// Translate through `POST /translate/stream`, calling `on_chunk` for every
    /// chunk as it arrives. Returns the concatenated output.
    pub async fn translate_stream<F>(&self, request: &TranslationRequest, mut on_chunk: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let response = self.send("/translate/stream", request).await?;

        let mut output = String::new();
        let mut pending = Vec::new();
        let mut body = response.bytes_stream();
        while let Some(bytes) = body.next().await {
            let bytes = bytes.map_err(|e| TranslationError::NetworkError {
                message: format!("stream interrupted: {}", e),
            })?;
            pending.extend_from_slice(&bytes);

            // Chunks may split a multi-byte character; hold back the tail.
            let valid = match std::str::from_utf8(&pending) {
                Ok(text) => text.len(),
                Err(e) => e.valid_up_to(),
            };
            if valid == 0 {
                continue;
            }
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);

            debug!("Received {} bytes", valid);
            on_chunk(&text);
            output.push_str(&text);
        }

        if !pending.is_empty() {
            warn!("Stream ended with {} undecodable bytes", pending.len());
        }

        Ok(output)
    }

    async fn send(&self, path: &str, request: &TranslationRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.url(path))
            .json(request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&error_text)
            .ok()
            .and_then(|json| json["detail"].as_str().map(|s| s.to_string()))
            .unwrap_or(error_text);

        Err(TranslationError::Api {
            status: status_code,
            message,
        })
    }
}
