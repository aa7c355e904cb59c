// proxy module - JSON transform proxy service

pub mod common;
pub mod config;
pub mod engine; // Transformation pipeline
pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod rpc; // Transform service client
pub mod rule_store;
pub mod server;
pub mod upstream; // Upstream client

pub use config::ProxyConfig;
pub use engine::ProxyEngine;
pub use rule_store::RuleStore;
pub use server::{build_router, AppState, AxumServer};
