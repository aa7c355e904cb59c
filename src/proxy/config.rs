use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// 反代服务配置
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Rule configuration document
    pub map_file: PathBuf,

    /// Target base URL, without trailing slash
    pub server: String,

    /// Per-call deadline for outbound calls (seconds). `None` means no deadline.
    #[serde(default)]
    pub request_timeout: Option<u64>,

    /// Largest inbound body buffered before it is rejected
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// 上游代理配置
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// 上游代理配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// 是否启用
    pub enabled: bool,
    /// 代理地址 (http://, https://, socks5://)
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            map_file: PathBuf::from("config.json"),
            server: "https://api.openai.com".to_string(),
            request_timeout: None,
            max_body_size: default_max_body_size(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

fn default_max_body_size() -> usize {
    100 * 1024 * 1024
}

impl ProxyConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the target URL and strip its trailing slash.
    pub fn normalized(mut self) -> AppResult<Self> {
        self.server = normalize_target_url(&self.server)?;
        Ok(self)
    }
}

/// Target URLs must be absolute http(s) URLs; the inbound path is appended verbatim.
pub fn normalize_target_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| AppError::Config(format!("Invalid target server URL {:?}: {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(AppError::Config(format!(
            "Unsupported target server scheme {:?} in {:?}",
            other, raw
        ))),
    }
}
