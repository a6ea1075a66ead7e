//! Type conversions for FanoutError

use super::types::FanoutError;

// Builder errors are raised by `send` before anything goes on the wire.
impl From<reqwest::Error> for FanoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_body() || err.is_decode() {
            FanoutError::BodyRead(err.to_string())
        } else if err.is_builder() {
            FanoutError::InvalidRequest(err.to_string())
        } else {
            FanoutError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for FanoutError {
    fn from(err: url::ParseError) -> Self {
        FanoutError::InvalidRequest(format!("Invalid URL: {}", err))
    }
}

impl From<tokio::task::JoinError> for FanoutError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            FanoutError::Join("worker task panicked".to_string())
        } else {
            FanoutError::Join("worker task was cancelled".to_string())
        }
    }
}
