use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::error::{AppError, AppResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::engine::ProxyEngine;
use crate::proxy::rpc::TransformClient;
use crate::proxy::rule_store::RuleStore;
use crate::proxy::upstream::UpstreamClient;

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProxyEngine>,
    pub max_body_size: usize,
}

impl AppState {
    pub fn new(engine: ProxyEngine, max_body_size: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            max_body_size,
        }
    }

    /// Wire the pipeline from process configuration.
    ///
    /// The forwarder and the transform client share one pooled HTTP client.
    pub fn from_config(config: &ProxyConfig, rules: RuleStore) -> AppResult<Self> {
        let http_client =
            crate::utils::http::create_client(config.request_timeout, Some(&config.upstream_proxy))?;

        let engine = ProxyEngine::new(
            rules,
            TransformClient::new(http_client.clone()),
            UpstreamClient::new(http_client, config.server.clone()),
        );
        Ok(Self::new(engine, config.max_body_size))
    }
}

/// Build the router: one catch-all route for every method and path.
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .fallback(handlers::proxy::handle_proxy)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::logging_middleware,
        ))
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        config: &ProxyConfig,
        state: AppState,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let app = build_router(state);

        // Bind address
        let addr = config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Proxy server listening at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                // One task per connection; requests never share mutable state
                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((
            Self {
                shutdown_tx: Some(shutdown_tx),
                local_addr,
            },
            handle,
        ))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
