// SPDX-License-Identifier: MIT

//! Typed error handling for compass-rs
//!
//! Agent-level failures never surface here: specialists absorb their own
//! errors into fallback messages. This hierarchy covers everything that can
//! still fail around the workflow (configuration, the model transport, the
//! session store, and the orchestration surface itself).

use thiserror::Error;

use crate::compass::store::StoreError;

/// Top-level error type for compass-rs
#[derive(Debug, Error)]
pub enum CompassError {
    /// Errors from the chat-model transport
    #[error("Model error from {provider}: {message}")]
    Model { provider: String, message: String },

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown or expired session
    #[error("Session '{0}' not found")]
    SessionNotFound(String),

    /// Session-store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Generic error wrapper for compatibility
    #[error("{0}")]
    Other(String),
}

impl CompassError {
    /// Create a model transport error
    pub fn model(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<&str> for CompassError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for CompassError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
