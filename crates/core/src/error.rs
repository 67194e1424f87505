#[derive(Debug, thiserror::Error)]
pub enum EcgError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
    #[error("insufficient data: {field} is required")]
    InsufficientData { field: String },
    #[error("ambiguous evidence: {0}")]
    AmbiguousEvidence(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("translation error: {0}")]
    Translation(String),
    #[error("failed to serialize summary: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
}

impl EcgError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EcgError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(field: impl Into<String>) -> Self {
        EcgError::InsufficientData {
            field: field.into(),
        }
    }

    /// The input field an error refers to, when it names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            EcgError::Validation { field, .. } | EcgError::InsufficientData { field } => {
                Some(field)
            }
            _ => None,
        }
    }
}

pub type EcgResult<T> = std::result::Result<T, EcgError>;
