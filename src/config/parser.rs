use std::path::Path;

use tracing::warn;

use super::schema::CONFIG_SCHEMA;
use super::types::UnillmConfig;
use crate::errors::UnillmError;
use crate::llm::catalog::ProviderKey;

pub async fn load_config(path: &Path) -> Result<UnillmConfig, UnillmError> {
    if !path.exists() {
        return Err(UnillmError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(UnillmError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<UnillmConfig, UnillmError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(UnillmConfig::default());
    }

    validate_schema(&yaml)?;

    let config: UnillmConfig = serde_yaml::from_value(yaml)?;

    for key in config.providers.keys() {
        key.parse::<ProviderKey>()?;
    }
    for (key, provider) in &config.providers {
        if provider.is_empty() && key != ProviderKey::Ollama.as_str() {
            warn!(provider = %key, "Provider configured without options, relying on environment");
        }
    }

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), UnillmError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| UnillmError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| UnillmError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| UnillmError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        if !messages.is_empty() {
            return Err(UnillmError::Config(messages.join("; ")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(
            "providers:\n  openai:\n    api_key: sk-test\n  aws:\n    aws_region: eu-west-1\n",
        )
        .unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers["aws"].get_str("aws_region").as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_parse_empty_document() {
        let config = parse_config("").unwrap();
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_provider() {
        let err = parse_config("providers:\n  openia:\n    api_key: x\n").unwrap_err();
        assert!(matches!(err, UnillmError::Config(_) | UnillmError::UnknownProvider { .. }));
    }

    #[test]
    fn test_parse_rejects_nested_option_values() {
        let err = parse_config("providers:\n  openai:\n    extra:\n      - 1\n").unwrap_err();
        assert!(matches!(err, UnillmError::Config(_)));
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/unillm.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unillm.yaml");
        tokio::fs::write(&path, "providers:\n  ollama:\n    base_url: http://localhost:11434\n")
            .await
            .unwrap();
        let config = load_config(&path).await.unwrap();
        assert_eq!(
            config.providers["ollama"].get_str("base_url").as_deref(),
            Some("http://localhost:11434")
        );
    }
}
