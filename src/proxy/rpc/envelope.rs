use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;
use crate::models::JsonDocument;

pub const JSONRPC_VERSION: &str = "2.0";
pub const TRANSFORM_METHOD: &str = "transform";

/// Outgoing call envelope: `{"jsonrpc":"2.0","method":"transform","params":{..},"id":n}`
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: &'a JsonDocument,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn transform(params: &'a JsonDocument, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: TRANSFORM_METHOD,
            params,
            id,
        }
    }
}

/// Reply envelope. `null` and absent fields are both `None`.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcResponse {
    /// Resolve the envelope into the transformed document.
    ///
    /// A non-null `error` wins over any `result`. The result must be an object.
    /// The reply id is not checked against `expected_id`.
    pub fn into_result(self, expected_id: u64) -> Result<JsonDocument, RpcError> {
        if let Some(error) = self.error {
            return Err(RpcError::Remote(error));
        }

        // Calls are not pipelined, so a stale or fixed id is only worth a log line
        match self.id {
            Some(Value::Number(ref n)) if n.as_u64() == Some(expected_id) => {}
            Some(ref actual) => tracing::warn!(
                "Transform reply id {} differs from request id {}",
                actual,
                expected_id
            ),
            None => tracing::debug!("Transform reply carries no id (request id {})", expected_id),
        }

        match self.result {
            Some(Value::Object(document)) => Ok(document),
            Some(other) => Err(RpcError::NonObjectResult(json_kind(&other))),
            None => Err(RpcError::NonObjectResult("null")),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
