// SPDX-License-Identifier: MIT

//! Chat model abstraction
//!
//! Every agent talks to a language model through the [`ChatModel`] trait so
//! that specialists can be exercised against scripted mocks in tests.

pub mod openai;

use crate::compass::error::CompassError;
use async_trait::async_trait;
use serde::Serialize;

/// One message in a chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion capable model
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion over the given messages and return the reply text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompassError>;
}
