// Remote transform calls (JSON-RPC 2.0 over HTTP POST)

pub mod client;
pub mod envelope;

pub use client::TransformClient;
pub use envelope::{RpcRequest, RpcResponse};
