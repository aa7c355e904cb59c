// Upstream client implementation
// Forwards the (possibly transformed) payload to the target server

use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::Client;

use crate::error::ProxyError;
use crate::models::JsonDocument;
use crate::proxy::common::headers::forwardable_request_headers;

/// Fully buffered reply from the target server.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: JsonDocument,
}

pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// `base_url` must not end with a slash; see `normalize_target_url`.
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build target URL
    ///
    /// The inbound path is appended to the base URL as-is.
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Forward a request to the target server
    ///
    /// Reuses the inbound method and path, and copies the inbound headers.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        headers: &HeaderMap,
        body: &JsonDocument,
    ) -> Result<UpstreamResponse, ProxyError> {
        let url = self.build_url(path);
        let payload = serde_json::to_vec(body).map_err(ProxyError::Encode)?;

        tracing::info!("Forwarding to: {} {}", method, url);

        let response = self
            .http_client
            .request(method, &url)
            .headers(forwardable_request_headers(headers))
            .body(payload)
            .send()
            .await
            .map_err(ProxyError::Forward)?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(ProxyError::Forward)?;

        tracing::debug!("Upstream replied {} ({} bytes)", status, bytes.len());

        let body: JsonDocument = serde_json::from_slice(&bytes).map_err(ProxyError::ResponseDecode)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
