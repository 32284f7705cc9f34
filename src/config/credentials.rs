use tracing::debug;

use super::types::ProviderConfig;
use crate::errors::UnillmError;

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Mask every secret of four or more characters in `text`.
pub fn redact(text: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|s| s.len() >= 4)
        .fold(text.to_string(), |acc, secret| acc.replace(secret, "[REDACTED]"))
}

impl ProviderConfig {
    /// Config option first, then the environment variable. Empty values count
    /// as absent.
    pub fn resolve(&self, option: &str, env_var: &str) -> Option<String> {
        self.option(option)
            .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
    }

    /// Config option only, with `$VAR` references expanded. Empty values
    /// count as absent.
    pub fn option(&self, option: &str) -> Option<String> {
        self.get_str(option)
            .map(|v| resolve_credential(&v))
            .filter(|v| !v.is_empty())
    }

    /// Like [`ProviderConfig::resolve`], but a missing value is a
    /// `MissingCredential` error naming `env_var`.
    pub fn require(&self, provider: &str, option: &str, env_var: &str) -> Result<String, UnillmError> {
        self.resolve(option, env_var).ok_or_else(|| UnillmError::MissingCredential {
            provider: provider.to_string(),
            variable: env_var.to_string(),
        })
    }
}
