use thiserror::Error;

/// Everything that can end a generation, settings or export attempt.
///
/// Variants carry plain strings so results can be cloned into UI events.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GenerationError {
    /// Message shown in the alert banner. Transport failures get a fixed
    /// remediation hint naming the backend; everything else passes through.
    pub fn user_message(&self, backend_origin: &str) -> String {
        match self {
            GenerationError::Network(_) => format!(
                "🔌 Cannot connect to the server. Make sure the image generation backend is running at {}",
                backend_origin
            ),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
