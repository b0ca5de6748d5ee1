//! Bridge error type

use thiserror::Error;
use triage_core::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// Network failure or non-success HTTP status from a backend
    #[error("{provider} API error: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("No text response from AI")]
    EmptyResponse,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    pub fn transport(provider: &'static str, message: impl Into<String>) -> Self {
        BridgeError::Transport {
            provider,
            message: message.into(),
        }
    }

    /// True when the backend could not be reached or refused the request
    pub fn is_transport(&self) -> bool {
        matches!(self, BridgeError::Transport { .. })
    }
}
