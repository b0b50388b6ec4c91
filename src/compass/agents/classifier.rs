// SPDX-License-Identifier: MIT

//! LLM-backed query classifier consumed by the router

use crate::compass::agents::{Classifier, RouteVerdict};
use crate::compass::error::CompassError;
use crate::compass::profile::UserProfile;
use crate::compass::workflow::state::{render_history, ChatTurn};
use crate::llm::{ChatMessage, ChatModel};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are a routing classifier for a career coaching assistant.
Given the user's message, recent conversation and profile context, pick exactly one agent:

- profile_updater: the user shares new information about themselves (skills, jobs, education, headline, about text)
- job_fit_analyst: the user wants their profile compared against a job description or posting
- career_path: the user asks for career guidance, growth advice or next steps
- content_enhancement: the user wants profile text written or improved (headline, about section, experience descriptions)
- end: the message needs no specialist (greetings, thanks, goodbyes)

Respond with JSON only, no prose:
{"agent": "<one of the five tags>", "needs_followup": <true if another agent should run after this one, else false>}"#;

pub struct LlmClassifier {
    model: Arc<dyn ChatModel>,
}

impl LlmClassifier {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(
        &self,
        query: &str,
        history: &[ChatTurn],
        context: &UserProfile,
    ) -> Result<RouteVerdict, CompassError> {
        let mut prompt = String::new();
        if !history.is_empty() {
            prompt.push_str("Recent conversation:\n");
            prompt.push_str(&render_history(history));
            prompt.push_str("\n\n");
        }
        if !context.skills.is_empty() {
            prompt.push_str(&format!(
                "User skills: {}\n\n",
                context.skills.join(", ")
            ));
        }
        prompt.push_str(&format!("User message: {query}"));

        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let raw = self.model.complete(&messages).await?;
        Ok(parse_verdict(&raw))
    }
}

#[derive(Deserialize)]
struct RawVerdict {
    agent: String,
    #[serde(default)]
    needs_followup: bool,
}

/// Tolerant parse of the model reply. Code fences are stripped; a non-JSON
/// reply is treated as a bare agent tag. Validation against the closed
/// decision set is the router's job.
fn parse_verdict(raw: &str) -> RouteVerdict {
    let trimmed = strip_code_fence(raw);
    if let Ok(parsed) = serde_json::from_str::<RawVerdict>(trimmed) {
        return RouteVerdict {
            agent: parsed.agent,
            needs_followup: parsed.needs_followup,
        };
    }
    RouteVerdict {
        agent: trimmed.trim().to_lowercase(),
        needs_followup: false,
    }
}

pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let verdict = parse_verdict(r#"{"agent": "job_fit_analyst", "needs_followup": true}"#);
        assert_eq!(verdict.agent, "job_fit_analyst");
        assert!(verdict.needs_followup);
    }

    #[test]
    fn test_parse_fenced_json() {
        let verdict = parse_verdict("```json\n{\"agent\": \"career_path\"}\n```");
        assert_eq!(verdict.agent, "career_path");
        assert!(!verdict.needs_followup);
    }

    #[test]
    fn test_parse_bare_tag() {
        let verdict = parse_verdict("  Profile_Updater \n");
        assert_eq!(verdict.agent, "profile_updater");
    }

    #[test]
    fn test_parse_prose_passes_through_for_router_defaulting() {
        let verdict = parse_verdict("I think the user wants career advice");
        assert_eq!(verdict.agent, "i think the user wants career advice");
    }
}
