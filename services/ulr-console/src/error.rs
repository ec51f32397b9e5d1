//! Error types for the ULR console

/// Errors that can occur in the ULR console
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The remote answered with a non-success HTTP status
    #[error("Error: {0}")]
    Transport(u16),

    /// The request never produced a response (refused, timed out, reset)
    #[error("HTTP request failed: {0}")]
    Network(String),

    #[error("Invalid response format from server")]
    Format,

    #[error("Unknown error occurred")]
    Unknown(String),

    #[error("Invalid form field: {0}")]
    InvalidField(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
