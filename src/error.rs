//! Error handling for the resume scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resume text was empty or whitespace only; no analysis was attempted.
    #[error("No content: resume text is empty")]
    EmptyInput,

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

impl ResumeScorerError {
    /// Errors a caller should recover from locally rather than surface.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ResumeScorerError::ExternalService(_) | ResumeScorerError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ResumeScorerError::ExternalService("timeout".to_string()).is_transient());
        assert!(!ResumeScorerError::EmptyInput.is_transient());
        assert!(!ResumeScorerError::UnknownRole("Chef".to_string()).is_transient());
    }

    #[test]
    fn test_empty_input_message() {
        assert_eq!(
            ResumeScorerError::EmptyInput.to_string(),
            "No content: resume text is empty"
        );
    }
}
