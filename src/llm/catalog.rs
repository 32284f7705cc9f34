use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UnillmError;

/// The closed set of vendors this crate can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKey {
    Anthropic,
    Aws,
    Azure,
    Fireworks,
    Google,
    Groq,
    Mistral,
    Octo,
    Ollama,
    #[serde(rename = "openai")]
    OpenAI,
    Replicate,
    Together,
}

impl ProviderKey {
    pub const ALL: [ProviderKey; 12] = [
        ProviderKey::Anthropic,
        ProviderKey::Aws,
        ProviderKey::Azure,
        ProviderKey::Fireworks,
        ProviderKey::Google,
        ProviderKey::Groq,
        ProviderKey::Mistral,
        ProviderKey::Octo,
        ProviderKey::Ollama,
        ProviderKey::OpenAI,
        ProviderKey::Replicate,
        ProviderKey::Together,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Fireworks => "fireworks",
            Self::Google => "google",
            Self::Groq => "groq",
            Self::Mistral => "mistral",
            Self::Octo => "octo",
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Replicate => "replicate",
            Self::Together => "together",
        }
    }

    /// Comma-separated list of every valid key, for error messages.
    pub fn valid_keys() -> String {
        Self::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    }

    pub fn info(&self) -> &'static ProviderInfo {
        // PROVIDERS is ordered like ALL
        &PROVIDERS[*self as usize]
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKey {
    type Err = UnillmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnillmError::UnknownProvider {
                provider: s.to_string(),
                valid: Self::valid_keys(),
            })
    }
}

pub struct ProviderInfo {
    pub key: ProviderKey,
    pub name: &'static str,
    /// Environment variables consulted when the config omits a value.
    pub env_vars: &'static [&'static str],
}

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo { key: ProviderKey::Anthropic, name: "Anthropic", env_vars: &["ANTHROPIC_API_KEY"] },
    ProviderInfo {
        key: ProviderKey::Aws,
        name: "AWS Bedrock",
        env_vars: &["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN", "AWS_REGION"],
    },
    ProviderInfo { key: ProviderKey::Azure, name: "Azure AI", env_vars: &["AZURE_API_KEY", "AZURE_REGION"] },
    ProviderInfo { key: ProviderKey::Fireworks, name: "Fireworks", env_vars: &["FIREWORKS_API_KEY"] },
    ProviderInfo {
        key: ProviderKey::Google,
        name: "Google Vertex AI",
        env_vars: &["GOOGLE_PROJECT_ID", "GOOGLE_REGION", "GCLOUD_ACCESS_TOKEN", "GOOGLE_APPLICATION_CREDENTIALS"],
    },
    ProviderInfo { key: ProviderKey::Groq, name: "Groq", env_vars: &["GROQ_API_KEY"] },
    ProviderInfo { key: ProviderKey::Mistral, name: "Mistral", env_vars: &["MISTRAL_API_KEY"] },
    ProviderInfo { key: ProviderKey::Octo, name: "OctoAI", env_vars: &["OCTO_API_KEY"] },
    ProviderInfo { key: ProviderKey::Ollama, name: "Ollama (local)", env_vars: &["OLLAMA_API_URL"] },
    ProviderInfo { key: ProviderKey::OpenAI, name: "OpenAI", env_vars: &["OPENAI_API_KEY"] },
    ProviderInfo { key: ProviderKey::Replicate, name: "Replicate", env_vars: &["REPLICATE_API_KEY"] },
    ProviderInfo { key: ProviderKey::Together, name: "Together", env_vars: &["TOGETHER_API_KEY"] },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_keys() {
        for key in ProviderKey::ALL {
            assert_eq!(key.info().key, key);
        }
        assert_eq!(PROVIDERS.len(), ProviderKey::ALL.len());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("openai".parse::<ProviderKey>().unwrap(), ProviderKey::OpenAI);
        assert!("OpenAI".parse::<ProviderKey>().is_err());
    }

    #[test]
    fn test_unknown_key_lists_valid_keys() {
        let err = "huggingface".parse::<ProviderKey>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'huggingface'"));
        for key in ProviderKey::ALL {
            assert!(msg.contains(key.as_str()), "missing {} in {}", key, msg);
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for key in ProviderKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }
}
