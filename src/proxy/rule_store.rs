use std::path::Path;
use std::sync::Arc;

use crate::error::{AppResult, ProxyError};
use crate::models::{RuleConfig, TransformRule};
use crate::modules::config::load_rule_config;

/// Immutable, ordered rule table loaded once at startup.
///
/// Shared read-only between request tasks; cloning only bumps a refcount.
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Arc<[TransformRule]>,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RuleStore {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self {
            rules: rules.into(),
        }
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let config = load_rule_config(path)?;
        Ok(Self::from(config))
    }

    /// The rule applied to every request: always the first one.
    ///
    /// Path, method and body play no part in the choice.
    pub fn select_rule(&self) -> Result<&TransformRule, ProxyError> {
        self.rules.first().ok_or(ProxyError::NoRule)
    }

    pub fn rules(&self) -> &[TransformRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<RuleConfig> for RuleStore {
    fn from(config: RuleConfig) -> Self {
        Self::new(config.rules)
    }
}
