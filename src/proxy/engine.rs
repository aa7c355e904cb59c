// Transformation pipeline
//
// Receive -> SelectRule -> PreTransform -> Forward -> PostTransform -> Respond.
// Any stage failure ends the request; nothing already done is undone.

use axum::{
    body::Body,
    http::{HeaderMap, Method},
    response::Response,
};

use crate::error::ProxyError;
use crate::models::JsonDocument;
use crate::proxy::common::headers::relayable_response_headers;
use crate::proxy::rpc::TransformClient;
use crate::proxy::rule_store::RuleStore;
use crate::proxy::upstream::{UpstreamClient, UpstreamResponse};

pub struct ProxyEngine {
    rules: RuleStore,
    transform: TransformClient,
    upstream: UpstreamClient,
}

impl ProxyEngine {
    pub fn new(rules: RuleStore, transform: TransformClient, upstream: UpstreamClient) -> Self {
        Self {
            rules,
            transform,
            upstream,
        }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Run one inbound request through the pipeline.
    pub async fn handle(
        &self,
        method: Method,
        path: &str,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Response, ProxyError> {
        // 1. Receive
        let mut payload = decode_document(body)?;

        // 2. Select rule
        let rule = self.rules.select_rule()?;
        tracing::debug!("Applying rule '{}' ({} -> {})", rule.tag, rule.from, rule.to);

        // 3. Pre-transform
        if let Some(pre) = rule.pre.as_deref() {
            tracing::info!("Calling pre-transform: {}", pre);
            payload = self
                .transform
                .invoke(pre, &payload)
                .await
                .map_err(ProxyError::PreTransform)?;
        }

        // 4. Forward
        let UpstreamResponse {
            status,
            headers: upstream_headers,
            body: mut document,
        } = self.upstream.forward(method, path, headers, &payload).await?;

        // 5. Post-transform. The upstream call has already happened at this point.
        if let Some(post) = rule.post.as_deref() {
            tracing::info!("Calling post-transform: {}", post);
            document = self
                .transform
                .invoke(post, &document)
                .await
                .map_err(ProxyError::PostTransform)?;
        }

        // 6. Respond
        let final_body = serde_json::to_vec(&document).map_err(ProxyError::Encode)?;

        let mut response = Response::new(Body::from(final_body));
        *response.status_mut() = status;
        *response.headers_mut() = relayable_response_headers(&upstream_headers);
        Ok(response)
    }
}

/// Inbound bodies must be JSON objects.
fn decode_document(body: &[u8]) -> Result<JsonDocument, ProxyError> {
    serde_json::from_slice(body).map_err(|e| ProxyError::BadRequest(format!("invalid json: {}", e)))
}
