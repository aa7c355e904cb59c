pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Proxy service module
pub mod utils;

use error::{AppError, AppResult};
use proxy::{AppState, AxumServer, ProxyConfig, RuleStore};
use tracing::{info, warn};

/// Load the rule table, start the proxy, and serve until Ctrl-C.
pub async fn run(config: ProxyConfig) -> AppResult<()> {
    let config = config.normalized()?;

    let rules = RuleStore::load(&config.map_file)?;
    match rules.select_rule() {
        Ok(rule) => info!(
            "Loaded {} rule(s) from {}, applying '{}'",
            rules.len(),
            config.map_file.display(),
            rule.tag
        ),
        Err(_) => warn!(
            "No transformation rules in {}; every request will be rejected",
            config.map_file.display()
        ),
    }

    let state = AppState::from_config(&config, rules)?;
    let (server, mut handle) = AxumServer::start(&config, state).await?;
    info!(
        "Starting llsed on {}, proxying to {}",
        server.local_addr(),
        config.server
    );

    let stopped_by_signal = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            true
        }
        joined = &mut handle => {
            joined.map_err(|e| AppError::Server(format!("Server task failed: {}", e)))?;
            false
        }
    };

    if stopped_by_signal {
        info!("Shutdown signal received");
        server.stop();
        handle
            .await
            .map_err(|e| AppError::Server(format!("Server task failed: {}", e)))?;
    }
    Ok(())
}
