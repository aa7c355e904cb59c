use reqwest::{Client, Proxy};
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::proxy::config::UpstreamProxyConfig;

/// Create the pooled HTTP client shared by the forwarder and the transform client.
///
/// Connections are reused across requests. No deadline is applied unless
/// `timeout_secs` is given.
pub fn create_client(
    timeout_secs: Option<u64>,
    proxy_config: Option<&UpstreamProxyConfig>,
) -> AppResult<Client> {
    let mut builder = Client::builder().user_agent(concat!("llsed/", env!("CARGO_PKG_VERSION")));

    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
        tracing::info!("Outbound call deadline: {}s", secs);
    }

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            validate_proxy_url(&config.url)?;
            let proxy = Proxy::all(&config.url).map_err(|e| {
                AppError::Config(format!("Invalid proxy address {}: {}", config.url, e))
            })?;
            builder = builder.proxy(proxy);
            tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
        }
    }

    Ok(builder.build()?)
}

/// reqwest accepts unknown schemes here and only fails on first use.
fn validate_proxy_url(raw: &str) -> AppResult<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| AppError::Config(format!("Invalid proxy address {}: {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" | "socks5" | "socks5h" => Ok(()),
        other => Err(AppError::Config(format!(
            "Unsupported proxy scheme {:?} in {}",
            other, raw
        ))),
    }
}
