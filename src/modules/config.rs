use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::RuleConfig;

/// Load the rule configuration document from `path`.
pub fn load_rule_config(path: &Path) -> AppResult<RuleConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;

    parse_rule_config(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config {}: {}", path.display(), e)))
}

pub fn parse_rule_config(content: &str) -> Result<RuleConfig, serde_json::Error> {
    serde_json::from_str(content)
}
