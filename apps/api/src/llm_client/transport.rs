//! HTTP transport seam for the completion client.
//!
//! The client only needs "POST this JSON, give me status + body", so the wire
//! is hidden behind [`Transport`] and can be replaced by a scripted fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Status code and raw body of a single upstream exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a status line (connect, TLS, timeout, body read).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // URLs may carry credentials; keep them out of logs
        TransportError(e.without_url().to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by `reqwest`.
/// The API key travels in the `x-goog-api-key` header, never in the URL.
pub struct ReqwestTransport {
    client: Client,
    api_key: String,
}

impl ReqwestTransport {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}
