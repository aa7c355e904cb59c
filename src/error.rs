use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

/// Process-level errors. Any of these at startup stops the process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

// Implement alias for Result to simplify usage
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single remote transform call.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to encode request envelope: {0}")]
    Encode(serde_json::Error),

    #[error("malformed response (HTTP {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    #[error("rpc error: {0}")]
    Remote(Value),

    #[error("result is {0}, expected a JSON object")]
    NonObjectResult(&'static str),
}

/// Terminal failure of one proxied request.
///
/// Each variant maps to the status code the client sees; the body is the
/// `Display` text as plain text.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("{0}")]
    BadRequest(String),

    #[error("no transformation rules configured")]
    NoRule,

    #[error("pre-transform failed: {0}")]
    PreTransform(RpcError),

    #[error("post-transform failed: {0}")]
    PostTransform(RpcError),

    #[error("failed to forward request: {0}")]
    Forward(reqwest::Error),

    #[error("invalid response from target: {0}")]
    ResponseDecode(serde_json::Error),

    #[error("failed to encode payload: {0}")]
    Encode(serde_json::Error),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::NoRule
            | ProxyError::PreTransform(_)
            | ProxyError::PostTransform(_)
            | ProxyError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Forward(_) | ProxyError::ResponseDecode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_client_error() {
            tracing::warn!("Rejected request ({}): {}", status.as_u16(), message);
        } else {
            tracing::error!("Request failed ({}): {}", status.as_u16(), message);
        }

        (status, message).into_response()
    }
}
