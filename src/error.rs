use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Result with SpamError
pub type Result<T> = std::result::Result<T, SpamError>;

/// Error types for the spam classification pipeline
#[derive(Error, Debug)]
pub enum SpamError {
    /// No email text was supplied to the pipeline
    #[error("No email text provided")]
    MissingInput,

    /// A linguistic resource could not be found in any search location
    #[error("Resource '{resource}' not found (searched: {})", display_paths(.searched))]
    ResourceUnavailable {
        resource: String,
        searched: Vec<PathBuf>,
    },

    /// A linguistic resource exists but could not be parsed
    #[error("Failed to parse resource {path:?}: {message}")]
    ResourceParse { path: PathBuf, message: String },

    /// Token vocabulary artifact is missing, corrupt or unsupported
    #[error("Vocabulary error: {0}")]
    VocabularyError(String),

    /// Classifier model artifact could not be loaded
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    /// The model failed while scoring a sequence
    #[error("Inference error: {0}")]
    InferenceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SpamError {
    /// Errors raised while loading resources, before any prediction can run
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            SpamError::ResourceUnavailable { .. }
                | SpamError::ResourceParse { .. }
                | SpamError::VocabularyError(_)
                | SpamError::ModelLoad(_)
                | SpamError::ConfigError(_)
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
