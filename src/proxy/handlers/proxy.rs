// Catch-all handler: every method and path goes through the pipeline
use axum::{
    extract::{Request, State},
    response::Response,
};

use crate::error::ProxyError;
use crate::proxy::server::AppState;

pub async fn handle_proxy(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| ProxyError::BadRequest(format!("failed to read request: {}", e)))?;

    state
        .engine
        .handle(parts.method, parts.uri.path(), &parts.headers, &body)
        .await
}
