// SPDX-License-Identifier: MIT

//! OpenAI-compatible chat completion client
//!
//! Works against the OpenAI API or any compatible gateway (the default base
//! URL points at OpenRouter).

use super::{ChatMessage, ChatModel};
use crate::compass::error::CompassError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenAI-compatible chat model
pub struct OpenAiChatModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiChatModel {
    /// Create a new client from the environment.
    ///
    /// Requires `OPENROUTER_API_KEY` or `OPENAI_API_KEY` to be set.
    /// Optionally uses `COMPASS_BASE_URL` for custom endpoints.
    pub fn from_env(model_name: String) -> Result<Self, CompassError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .map_err(|_| CompassError::config("OPENROUTER_API_KEY or OPENAI_API_KEY must be set"))?;
        let base_url =
            env::var("COMPASS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
            temperature: 0.2,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompassError> {
        let body = json!({
            "model": self.model_name,
            "messages": messages,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CompassError::model(
                "openai",
                format!("HTTP {}: {}", status, text),
            ));
        }

        let payload: serde_json::Value = response.json().await?;
        payload["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(|content| content.to_string())
            .ok_or_else(|| CompassError::model("openai", "no content in chat completion"))
    }
}
