use std::fmt;

use super::catalog::ProviderKey;
use crate::errors::UnillmError;

/// A parsed `"provider:model"` identifier. Only the first `:` separates;
/// the vendor model name keeps any further colons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: ProviderKey,
    pub model: String,
}

impl ModelId {
    pub fn parse(model: &str) -> Result<Self, UnillmError> {
        let (provider, name) = split_model(model)?;
        Ok(Self {
            provider: provider.parse()?,
            model: name.to_string(),
        })
    }
}

/// Split without validating the provider key.
pub fn split_model(model: &str) -> Result<(&str, &str), UnillmError> {
    model.split_once(':').ok_or_else(|| UnillmError::InvalidModelFormat {
        model: model.to_string(),
    })
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}
