use std::fmt;

/// Error types for plan document parsing
#[derive(Debug)]
pub enum PlanError {
    /// The document root is not a JSON object
    NotAnObject,

    /// The declared format version is not supported
    UnsupportedFormatVersion {
        found: Option<String>,
        supported: Vec<String>,
    },

    /// The mandatory `resource_changes` field is absent
    MissingResourceChanges,

    /// The document is not valid JSON
    Json(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::NotAnObject => write!(f, "Plan data must be a JSON object"),
            PlanError::UnsupportedFormatVersion { found, supported } => {
                write!(
                    f,
                    "Unsupported format version: {}. Supported versions: {}",
                    found.as_deref().unwrap_or("none"),
                    supported.join(", ")
                )
            }
            PlanError::MissingResourceChanges => {
                write!(f, "Plan data missing 'resource_changes' field")
            }
            PlanError::Json(msg) => write!(f, "Invalid plan JSON: {}", msg),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Json(err.to_string())
    }
}

/// Result type for plan parsing
pub type PlanResult<T> = Result<T, PlanError>;
