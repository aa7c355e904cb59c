pub mod rule;

pub use rule::{JsonDocument, RuleConfig, TransformRule};
