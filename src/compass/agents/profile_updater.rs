// SPDX-License-Identifier: MIT

//! Profile-updater specialist
//!
//! Extracts profile changes from the user's message as a proposal only. The
//! engine routes the proposal through human confirmation before anything is
//! written; this agent never touches the stored profile.

use crate::compass::agents::{classifier::strip_code_fence, Agent, AgentKind};
use crate::compass::profile::ProfileDelta;
use crate::compass::workflow::state::{NextStep, ProfileUpdateResult, WorkflowState};
use crate::llm::{ChatMessage, ChatModel};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You extract profile updates from a user's message for a career coaching assistant.
Look for new skills, work experience, an updated about section or an updated headline.

Respond with JSON only:
{"has_updates": <bool>, "updates": {"skills": [..], "experience": [{"title": "..", "company": "..", "duration": null, "description": null}], "about": null, "headline": null}}

Only include fields the user actually mentioned. If the message contains no profile information, return {"has_updates": false, "updates": {}}."#;

#[derive(Deserialize)]
struct ExtractionReply {
    #[serde(default)]
    has_updates: bool,
    #[serde(default)]
    updates: ProfileDelta,
}

pub struct ProfileUpdaterAgent {
    model: Arc<dyn ChatModel>,
}

impl ProfileUpdaterAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    fn extract(&self, raw: &str) -> Option<ProfileDelta> {
        let reply: ExtractionReply = serde_json::from_str(strip_code_fence(raw)).ok()?;
        if reply.has_updates && !reply.updates.is_empty() {
            Some(reply.updates)
        } else {
            None
        }
    }
}

#[async_trait]
impl Agent for ProfileUpdaterAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::ProfileUpdater
    }

    async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        state.agent_type = self.kind().name().to_string();

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(state.current_user_query.clone()),
        ];

        match self.model.complete(&messages).await {
            Ok(raw) => match self.extract(&raw) {
                Some(delta) => {
                    state.profile_updates = Some(ProfileUpdateResult {
                        message: update_message(&delta),
                        updates: delta,
                    });
                }
                None => {
                    // Nothing extractable: hand the query back to the router
                    state.profile_updates = None;
                    state.next_agent = NextStep::Router;
                }
            },
            Err(e) => {
                log::warn!(
                    "Profile extraction failed for session {}: {}",
                    state.session_id,
                    e
                );
                state.profile_updates = None;
                state.next_agent = NextStep::Router;
            }
        }

        state
    }
}

fn update_message(delta: &ProfileDelta) -> String {
    let mut noted: Vec<String> = Vec::new();
    if !delta.skills.is_empty() {
        let shown: Vec<&str> = delta
            .skills
            .iter()
            .rev()
            .take(3)
            .rev()
            .map(String::as_str)
            .collect();
        noted.push(format!("new skills ({})", shown.join(", ")));
    }
    if !delta.experience.is_empty() {
        noted.push(format!("{} experience update(s)", delta.experience.len()));
    }
    if delta.about.is_some() {
        noted.push("a new about section".to_string());
    }
    if delta.headline.is_some() {
        noted.push("a new headline".to_string());
    }
    format!("I've updated your profile with {}.", noted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::error::CompassError;
    use crate::compass::profile::UserProfile;
    use async_trait::async_trait;

    struct FixedModel {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CompassError> {
            self.reply
                .clone()
                .map_err(|e| CompassError::model("mock", e))
        }
    }

    fn agent(reply: Result<&str, &str>) -> ProfileUpdaterAgent {
        ProfileUpdaterAgent::new(Arc::new(FixedModel {
            reply: reply.map(str::to_string).map_err(str::to_string),
        }))
    }

    fn state() -> WorkflowState {
        WorkflowState::new("s1", UserProfile::default(), "I now know Terraform", vec![])
    }

    #[tokio::test]
    async fn test_extracted_updates_become_a_proposal() {
        let reply = r#"{"has_updates": true, "updates": {"skills": ["Terraform"]}}"#;
        let out = agent(Ok(reply)).run(state()).await;
        let result = out.profile_updates.unwrap();
        assert_eq!(result.updates.skills, vec!["Terraform"]);
        assert!(result.message.contains("Terraform"));
        assert_eq!(out.agent_type, "profile_updater");
    }

    #[tokio::test]
    async fn test_no_updates_reroutes() {
        let reply = r#"{"has_updates": false, "updates": {}}"#;
        let out = agent(Ok(reply)).run(state()).await;
        assert!(out.profile_updates.is_none());
        assert_eq!(out.next_agent, NextStep::Router);
    }

    #[tokio::test]
    async fn test_model_failure_is_absorbed() {
        let out = agent(Err("timeout")).run(state()).await;
        assert!(out.profile_updates.is_none());
        assert_eq!(out.next_agent, NextStep::Router);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_absorbed() {
        let out = agent(Ok("sure, I'll update that!")).run(state()).await;
        assert!(out.profile_updates.is_none());
    }
}
