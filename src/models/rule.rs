use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// An untyped JSON object: request/response bodies and transform payloads.
pub type JsonDocument = Map<String, Value>;

/// Rule configuration document (`--map-file`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Ordered; only the first entry is ever applied
    #[serde(default)]
    pub rules: Vec<TransformRule>,
}

/// A single transformation rule.
///
/// `from`/`to` name the API formats on either side of the proxy. They are
/// informational only, as is `params`, which is kept verbatim so that
/// transform services and future matchers can rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRule {
    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: String,

    #[serde(default)]
    pub params: Map<String, Value>,

    /// Endpoint transforming the request before it is forwarded
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub pre: Option<String>,

    /// Endpoint transforming the upstream response before it is returned
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
}

/// `null`, `""` and a missing key all mean "skip this stage". Any other
/// string, whitespace included, is taken as an endpoint.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
