// SPDX-License-Identifier: MIT

//! Content-enhancement specialist: drafts or rewrites profile text

use crate::compass::agents::{Agent, AgentKind};
use crate::compass::profile::UserProfile;
use crate::compass::workflow::state::WorkflowState;
use crate::llm::{ChatMessage, ChatModel};
use async_trait::async_trait;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are a professional profile writer. Rewrite or draft the requested profile content (headline, about section, or experience descriptions) using the candidate's profile as source material. Be specific and achievement-oriented; avoid clichés. Return only the improved content with a one-line note on what you changed."#;

const ENHANCEMENT_FALLBACK: &str = "I couldn't generate a rewrite just now. A quick self-serve checklist: lead your headline with your specialty, open your about section with a one-line value statement, and turn each experience bullet into an achievement with a number in it. Ask me again and I'll draft it for you.";

pub struct ContentEnhancementAgent {
    model: Arc<dyn ChatModel>,
}

impl ContentEnhancementAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

fn render_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    if let Some(headline) = &profile.headline {
        out.push_str(&format!("Current headline: {headline}\n"));
    }
    if let Some(about) = &profile.about {
        out.push_str(&format!("Current about: {about}\n"));
    }
    if !profile.skills.is_empty() {
        out.push_str(&format!("Skills: {}\n", profile.skills.join(", ")));
    }
    for entry in &profile.experience {
        out.push_str(&format!("- {} at {}", entry.title, entry.company));
        if let Some(description) = &entry.description {
            out.push_str(&format!(": {description}"));
        }
        out.push('\n');
    }
    out
}

#[async_trait]
impl Agent for ContentEnhancementAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::ContentEnhancement
    }

    async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        state.agent_type = self.kind().name().to_string();

        let prompt = format!(
            "Profile:\n{}\nRequest: {}",
            render_profile(&state.user_profile_data),
            state.current_user_query
        );
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        state.content_enhancement_result = Some(match self.model.complete(&messages).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Content enhancement failed for session {}: {}",
                    state.session_id,
                    e
                );
                ENHANCEMENT_FALLBACK.to_string()
            }
        });
        state
    }
}
