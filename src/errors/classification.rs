use super::types::UnillmError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// The request left the process before failing.
    pub reached_vendor: bool,
}

impl UnillmError {
    /// Classify this error by type and by whether a vendor was contacted.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            UnillmError::InvalidModelFormat { .. } => ErrorClassification {
                error_type: "InvalidModelFormatError",
                reached_vendor: false,
            },
            UnillmError::UnknownProvider { .. } => ErrorClassification {
                error_type: "UnknownProviderError",
                reached_vendor: false,
            },
            UnillmError::MissingCredential { .. } => ErrorClassification {
                error_type: "MissingCredentialError",
                reached_vendor: false,
            },
            UnillmError::InvalidRequest(_) => ErrorClassification {
                error_type: "InvalidRequestError",
                reached_vendor: false,
            },
            UnillmError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                reached_vendor: false,
            },

            UnillmError::LocalServiceUnavailable { .. } => ErrorClassification {
                error_type: "LocalServiceUnavailableError",
                reached_vendor: true,
            },
            UnillmError::ProviderRequest { .. } => ErrorClassification {
                error_type: "ProviderRequestError",
                reached_vendor: true,
            },

            UnillmError::Io(_) => ErrorClassification {
                error_type: "IoError",
                reached_vendor: false,
            },
            UnillmError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                reached_vendor: false,
            },
            UnillmError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                reached_vendor: false,
            },
        }
    }

    /// Process exit code used by the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            UnillmError::InvalidModelFormat { .. }
            | UnillmError::UnknownProvider { .. }
            | UnillmError::Config(_)
            | UnillmError::Yaml(_) => 2,
            UnillmError::MissingCredential { .. } => 3,
            UnillmError::LocalServiceUnavailable { .. } => 4,
            UnillmError::ProviderRequest { .. } => 5,
            _ => 1,
        }
    }
}
