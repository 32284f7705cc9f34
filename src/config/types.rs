use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for a single provider: API key, base URL, region, timeout and
/// whatever else the vendor adapter reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProviderConfig(BTreeMap<String, Value>);

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, option: &str, value: impl Into<Value>) -> Self {
        self.set(option, value);
        self
    }

    pub fn set(&mut self, option: &str, value: impl Into<Value>) {
        self.0.insert(option.to_string(), value.into());
    }

    /// String view of an option. Numbers and booleans are stringified.
    pub fn get_str(&self, option: &str) -> Option<String> {
        match self.0.get(option)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn get_u64(&self, option: &str) -> Option<u64> {
        match self.0.get(option)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Overlay `other` on top of this config, option by option.
    pub fn merge(&mut self, other: ProviderConfig) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ProviderConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Provider configs keyed by provider key string (`"openai"`, `"aws"`, ...).
pub type ProviderConfigs = BTreeMap<String, ProviderConfig>;

/// Root of a YAML config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UnillmConfig {
    #[serde(default)]
    pub providers: ProviderConfigs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_str_stringifies_scalars() {
        let config = ProviderConfig::new()
            .with("api_key", "sk-test")
            .with("timeout", 60)
            .with("verbose", true);
        assert_eq!(config.get_str("api_key").as_deref(), Some("sk-test"));
        assert_eq!(config.get_str("timeout").as_deref(), Some("60"));
        assert_eq!(config.get_str("verbose").as_deref(), Some("true"));
        assert_eq!(config.get_str("missing"), None);
    }

    #[test]
    fn test_get_u64_accepts_numeric_strings() {
        let config = ProviderConfig::new().with("timeout", "45").with("other", json!([1]));
        assert_eq!(config.get_u64("timeout"), Some(45));
        assert_eq!(config.get_u64("other"), None);
    }

    #[test]
    fn test_merge_overrides_per_option() {
        let mut base = ProviderConfig::new().with("api_key", "old").with("timeout", 10);
        base.merge(ProviderConfig::new().with("api_key", "new"));
        assert_eq!(base.get_str("api_key").as_deref(), Some("new"));
        assert_eq!(base.get_u64("timeout"), Some(10));
    }

    #[test]
    fn test_config_file_deserialize() {
        let yaml = "providers:\n  openai:\n    api_key: sk-1\n    timeout: 20\n  ollama: {}\n";
        let parsed: UnillmConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.providers.len(), 2);
        assert_eq!(parsed.providers["openai"].get_u64("timeout"), Some(20));
        assert!(parsed.providers["ollama"].is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let config: ProviderConfig = [("region", "us-east-1")].into_iter().collect();
        assert_eq!(config.get_str("region").as_deref(), Some("us-east-1"));
    }
}
