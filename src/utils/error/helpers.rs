//! Helper functions for creating specific error types

use super::types::FanoutError;

impl FanoutError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    pub fn body_read<S: Into<String>>(message: S) -> Self {
        Self::BodyRead(message.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Whether this error is a configuration problem rather than a per-request one
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Io(_) | Self::Yaml(_))
    }
}
