use thiserror::Error;

/// Main error type for PrompTitecture
#[derive(Error, Debug)]
pub enum PromptitectureError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Architecture name not present in the catalog
    #[error("Unknown architecture: {0}")]
    UnknownArchitecture(String),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP server and client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using PromptitectureError
pub type Result<T> = std::result::Result<T, PromptitectureError>;
