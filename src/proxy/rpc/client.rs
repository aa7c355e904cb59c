// Transform client
// One blocking JSON-RPC call per pipeline stage, no retries

use reqwest::{header, Client};
use std::sync::atomic::{AtomicU64, Ordering};

use super::envelope::{RpcRequest, RpcResponse};
use crate::error::RpcError;
use crate::models::JsonDocument;

pub struct TransformClient {
    http_client: Client,
    next_id: AtomicU64,
}

impl TransformClient {
    pub fn new(http_client: Client) -> Self {
        Self {
            http_client,
            next_id: AtomicU64::new(1),
        }
    }

    /// Correlation id for the next call, unique for the lifetime of the client.
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send `payload` to `endpoint` and return the transformed document.
    pub async fn invoke(
        &self,
        endpoint: &str,
        payload: &JsonDocument,
    ) -> Result<JsonDocument, RpcError> {
        let id = self.next_id();
        let body = serde_json::to_vec(&RpcRequest::transform(payload, id)).map_err(RpcError::Encode)?;

        tracing::debug!("Transform call #{} -> {}", id, endpoint);

        let response = self
            .http_client
            .post(endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        // The HTTP status is not meaningful to the protocol; only the envelope is.
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: RpcResponse =
            serde_json::from_slice(&bytes).map_err(|e| RpcError::MalformedResponse {
                status: status.as_u16(),
                reason: e.to_string(),
            })?;

        envelope.into_result(id)
    }
}
