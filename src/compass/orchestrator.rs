// SPDX-License-Identifier: MIT

//! Turn orchestration over the workflow engine
//!
//! Owns the session-facing contract: load context, run or resume a turn,
//! persist the exchange, and shape the outcome for callers. Orchestration
//! failures never escape as errors; they become a generic error outcome
//! while the last good checkpoint stays untouched.

use crate::compass::agents::{AgentRegistry, Classifier};
use crate::compass::error::CompassError;
use crate::compass::profile::UserProfile;
use crate::compass::store::{HistoryEntry, SessionStore};
use crate::compass::workflow::state::{ChatTurn, WorkflowStage};
use crate::compass::workflow::{Node, TurnOutcome, WorkflowEngine, WorkflowState};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Prior exchanges loaded as context for a fresh turn
const HISTORY_WINDOW: usize = 6;

const ERROR_MESSAGE: &str =
    "I encountered an error processing your request. Please try again.";

/// Caller-facing result of one turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub message: String,
    pub agent_type: String,
    pub session_id: String,
    pub profile_updated: bool,
    pub requires_input: bool,
    pub input_type: Option<String>,
    pub workflow_stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_fit_analysis: Option<crate::compass::workflow::state::JobFitReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_path: Option<crate::compass::workflow::state::CareerPathReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_updates: Option<crate::compass::workflow::state::ProfileUpdateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_enhancement: Option<String>,
}

pub struct Orchestrator {
    engine: WorkflowEngine,
    store: Arc<dyn SessionStore>,
}

impl Orchestrator {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        agents: AgentRegistry,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            engine: WorkflowEngine::new(classifier, agents, store.clone()),
            store,
        }
    }

    /// Run one turn for a session. Infallible by contract: any internal
    /// failure is logged and surfaced as a generic error outcome.
    pub async fn process_turn(
        &self,
        session_id: &str,
        user_message: &str,
        profile: Option<UserProfile>,
        resume: bool,
    ) -> ChatOutcome {
        match self
            .try_process(session_id, user_message, profile, resume)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Turn failed for session {}: {}", session_id, e);
                ChatOutcome {
                    message: ERROR_MESSAGE.to_string(),
                    agent_type: "error".to_string(),
                    session_id: session_id.to_string(),
                    profile_updated: false,
                    requires_input: false,
                    input_type: None,
                    workflow_stage: WorkflowStage::Error.as_str().to_string(),
                    job_fit_analysis: None,
                    career_path: None,
                    profile_updates: None,
                    content_enhancement: None,
                }
            }
        }
    }

    async fn try_process(
        &self,
        session_id: &str,
        user_message: &str,
        profile: Option<UserProfile>,
        resume: bool,
    ) -> Result<ChatOutcome, CompassError> {
        if resume {
            match self.store.get_checkpoint(session_id).await? {
                Some(mut suspended) if suspended.requires_human_input => {
                    suspended.human_input_received = Some(user_message.to_string());
                    let (state, outcome) = self
                        .engine
                        .run_turn(suspended, Node::HumanInteraction)
                        .await;
                    return self.finish(user_message, state, outcome).await;
                }
                _ => {
                    // No suspended turn to resume; treat as a fresh message
                    log::warn!(
                        "Resume requested for session {} with no pending interrupt",
                        session_id
                    );
                }
            }
        }

        let profile = match profile {
            Some(profile) => profile,
            None => self
                .store
                .get_profile(session_id)
                .await?
                .ok_or_else(|| CompassError::SessionNotFound(session_id.to_string()))?,
        };

        let chat_history = self.load_history(session_id).await;
        let state = WorkflowState::new(session_id, profile, user_message, chat_history);
        let (state, outcome) = self.engine.run_turn(state, Node::Router).await;
        self.finish(user_message, state, outcome).await
    }

    /// Load recent history and rebuild it in chronological order
    async fn load_history(&self, session_id: &str) -> Vec<ChatTurn> {
        let entries = match self.store.get_history(session_id, HISTORY_WINDOW).await {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Failed to load history for session {}: {}", session_id, e);
                return Vec::new();
            }
        };
        let mut turns = Vec::with_capacity(entries.len() * 2);
        for entry in entries.into_iter().rev() {
            turns.push(ChatTurn::human(entry.message));
            turns.push(ChatTurn::ai(entry.response));
        }
        turns
    }

    async fn finish(
        &self,
        user_message: &str,
        state: WorkflowState,
        outcome: TurnOutcome,
    ) -> Result<ChatOutcome, CompassError> {
        match outcome {
            TurnOutcome::Completed => {
                let entry = HistoryEntry {
                    message: user_message.to_string(),
                    response: state.final_response.clone(),
                    agent_type: state.agent_type.clone(),
                    timestamp: Utc::now(),
                };
                if let Err(e) = self.store.append_history(&state.session_id, entry).await {
                    log::error!(
                        "Failed to persist history for session {}: {}",
                        state.session_id,
                        e
                    );
                }
                Ok(ChatOutcome {
                    message: state.final_response.clone(),
                    agent_type: state.agent_type.clone(),
                    session_id: state.session_id.clone(),
                    profile_updated: state.profile_updated,
                    requires_input: false,
                    input_type: None,
                    workflow_stage: state.workflow_stage.as_str().to_string(),
                    job_fit_analysis: state.job_fit_analysis,
                    career_path: state.career_path_response,
                    profile_updates: state.profile_updates,
                    content_enhancement: state.content_enhancement_result,
                })
            }
            TurnOutcome::NeedsInput { input_type, prompt } => Ok(ChatOutcome {
                message: prompt,
                agent_type: state.agent_type.clone(),
                session_id: state.session_id.clone(),
                profile_updated: state.profile_updated,
                requires_input: true,
                input_type: Some(input_type.as_str().to_string()),
                workflow_stage: state.workflow_stage.as_str().to_string(),
                job_fit_analysis: state.job_fit_analysis,
                career_path: state.career_path_response,
                profile_updates: state.profile_updates,
                content_enhancement: state.content_enhancement_result,
            }),
        }
    }
}
