// Request logging middleware
use axum::{extract::Request, middleware::Next, response::Response};
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Wrap each request in a span carrying a fresh request id, and log its outcome.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!("request", id = %request_id, method = %method, path = %path);

    async move {
        let started = Instant::now();
        tracing::info!("Request: {} {}", method, path);

        let response = next.run(request).await;

        tracing::info!(
            "Response: {} in {}ms",
            response.status().as_u16(),
            started.elapsed().as_millis()
        );
        response
    }
    .instrument(span)
    .await
}
