//! Error handling for the resume scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Feedback error: {0}")]
    Feedback(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScorerError>;

/// Model2Vec load failures arrive as anyhow errors with context attached
impl From<anyhow::Error> for ScorerError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate form keeps the whole context chain in one line
        ScorerError::Embedding(format!("{:#}", err))
    }
}

impl From<reqwest::Error> for ScorerError {
    fn from(err: reqwest::Error) -> Self {
        ScorerError::Network(err.to_string())
    }
}

impl ScorerError {
    /// True for errors raised before scoring because an input was missing or empty
    pub fn is_input_error(&self) -> bool {
        matches!(self, ScorerError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_anyhow_context_chain_is_kept() {
        let failed: anyhow::Result<()> = Err(anyhow::anyhow!("tokenizer.json missing"));
        let err: ScorerError = failed.context("Failed to load model from ./m").unwrap_err().into();

        match err {
            ScorerError::Embedding(message) => {
                assert!(message.contains("Failed to load model from ./m"));
                assert!(message.contains("tokenizer.json missing"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_only_invalid_input_is_an_input_error() {
        assert!(ScorerError::InvalidInput("empty".to_string()).is_input_error());
        assert!(!ScorerError::UnsupportedFormat("xyz".to_string()).is_input_error());
    }
}
