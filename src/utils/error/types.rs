//! Error types for the batch client

use thiserror::Error;

/// Result type alias for the batch client
pub type Result<T> = std::result::Result<T, FanoutError>;

/// Main error type for the batch client
#[derive(Error, Debug)]
pub enum FanoutError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure: the exchange never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response arrived but its body could not be read
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// The response body did not decode into the requested type
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Malformed request descriptor
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A worker task panicked or was cancelled before reporting
    #[error("Worker task failed: {0}")]
    Join(String),
}
