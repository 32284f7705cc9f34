use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnillmError {
    #[error("Invalid model format. Expected 'provider:model', got '{model}'")]
    InvalidModelFormat { model: String },

    #[error("Invalid provider key '{provider}'. Expected one of: {valid}. Make sure the model string is formatted correctly as 'provider:model'.")]
    UnknownProvider { provider: String, valid: String },

    #[error("{provider} credential is missing. Provide it in the config or set the {variable} environment variable.")]
    MissingCredential { provider: String, variable: String },

    #[error("{provider} is unavailable: {message}")]
    LocalServiceUnavailable { provider: String, message: String },

    #[error("{provider} request failed{}: {message}", .status.map(|s| format!(" with status {}", s)).unwrap_or_default())]
    ProviderRequest {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl UnillmError {
    pub(crate) fn request(provider: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        UnillmError::ProviderRequest {
            provider: provider.to_string(),
            status,
            message: message.into(),
        }
    }

    pub(crate) fn malformed(provider: &str, what: &str) -> Self {
        Self::request(provider, None, format!("malformed response: missing {}", what))
    }
}

pub type Result<T, E = UnillmError> = std::result::Result<T, E>;
