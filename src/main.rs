//! llsed entry point.
//!
//! JSON rewriting proxy: forwards API calls to a target server, optionally
//! passing request and response bodies through remote transform services.

use anyhow::{Context, Result};
use clap::Parser;
use llsed_lib::modules::logger;
use llsed_lib::proxy::config::{ProxyConfig, UpstreamProxyConfig};
use llsed_lib::proxy::RuleStore;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "llsed")]
#[command(author, version, about = "JSON rewriting proxy for LLM APIs")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "LLSED_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "LLSED_PORT", default_value_t = 8080)]
    port: u16,

    /// Path to mapping configuration file
    #[arg(long = "map-file", alias = "map_file", env = "LLSED_MAP_FILE", default_value = "config.json")]
    map_file: PathBuf,

    /// Target server URL
    #[arg(long, env = "LLSED_SERVER", default_value = "https://api.openai.com")]
    server: String,

    /// Deadline for each outbound call, in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value_t = 100 * 1024 * 1024)]
    max_body_size: usize,

    /// Proxy for outbound calls (http://, https://, socks5://)
    #[arg(long, env = "LLSED_UPSTREAM_PROXY")]
    upstream_proxy: Option<String>,

    /// Also write daily rolling log files to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Validate the mapping configuration and exit
    #[arg(long)]
    validate: bool,
}

impl Args {
    fn into_config(self) -> ProxyConfig {
        let upstream_proxy = match self.upstream_proxy {
            Some(url) => UpstreamProxyConfig { enabled: true, url },
            None => UpstreamProxyConfig::default(),
        };

        ProxyConfig {
            host: self.host,
            port: self.port,
            map_file: self.map_file,
            server: self.server,
            request_timeout: self.timeout_secs,
            max_body_size: self.max_body_size,
            upstream_proxy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init_logger(&args.log_level, args.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("Failed to initialize logging")?;

    let validate_only = args.validate;
    let config = args.into_config();

    if validate_only {
        return validate(config);
    }

    llsed_lib::run(config)
        .await
        .context("Failed to run llsed")
}

/// Run the same configuration checks as startup, without binding a socket.
fn validate(config: ProxyConfig) -> Result<()> {
    let config = config.normalized().context("Invalid target server")?;
    let rules = RuleStore::load(&config.map_file)
        .with_context(|| format!("Invalid configuration: {}", config.map_file.display()))?;

    info!(
        "Configuration is valid ({} rule(s), target {})",
        rules.len(),
        config.server
    );
    for (index, rule) in rules.rules().iter().enumerate() {
        info!(
            "  [{}] {}: {} -> {} (pre: {}, post: {})",
            index,
            rule.tag,
            rule.from,
            rule.to,
            rule.pre.as_deref().unwrap_or("-"),
            rule.post.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
