//! Error types for Gavel.

use thiserror::Error;

/// Library-level error type for Gavel operations.
#[derive(Error, Debug)]
pub enum GavelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Invalid response type. Expected {expected}, got: {received}")]
    UnsupportedMode { expected: String, received: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Gavel operations.
pub type Result<T> = std::result::Result<T, GavelError>;
