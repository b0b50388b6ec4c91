// SPDX-License-Identifier: MIT

//! Workflow engine
//!
//! Drives one turn as a tagged-node state machine: router, specialist
//! agents, the confirmation gate, the human-interaction suspension point and
//! the finalizer. The state is checkpointed after every transition so a
//! suspended turn can resume in a different process from exactly where it
//! stopped. Checkpoint failures are logged and never abort the turn.

use crate::compass::agents::{AgentKind, AgentRegistry, Classifier};
use crate::compass::profile::ProfileDelta;
use crate::compass::store::SessionStore;
use crate::compass::workflow::confirmation::{self, GateDecision};
use crate::compass::workflow::finalizer;
use crate::compass::workflow::human::{self, HumanStep, ResumeOutcome};
use crate::compass::workflow::router::Router;
use crate::compass::workflow::state::{HumanInputType, PendingConfirmation, WorkflowState};
use std::sync::Arc;

/// Hard ceiling on node transitions per turn
pub const MAX_STEPS: u32 = 12;

const STORE_DEGRADED_MESSAGE: &str =
    "I noted your information but couldn't update your profile right now.";

/// Nodes of the turn state machine. A turn enters at `Router` for fresh
/// messages and at `HumanInteraction` when resuming a suspended one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Router,
    Agent(AgentKind),
    RouterConfirmation,
    HumanInteraction,
    ResumeAfterHuman,
    Finalize,
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Completed,
    /// Suspended awaiting human input; the checkpoint holds the full state
    NeedsInput {
        input_type: HumanInputType,
        prompt: String,
    },
}

pub struct WorkflowEngine {
    router: Router,
    agents: AgentRegistry,
    store: Arc<dyn SessionStore>,
}

impl WorkflowEngine {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        agents: AgentRegistry,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            router: Router::new(classifier),
            agents,
            store,
        }
    }

    /// Run one turn to completion or suspension, starting at `entry`.
    ///
    /// Infallible: node failures are absorbed into the state and persistence
    /// failures degrade to logging, so the caller always gets the final
    /// state back.
    pub async fn run_turn(
        &self,
        mut state: WorkflowState,
        entry: Node,
    ) -> (WorkflowState, TurnOutcome) {
        let mut node = entry;
        let mut steps: u32 = 0;

        loop {
            steps += 1;
            if steps > MAX_STEPS && node != Node::Finalize {
                log::warn!(
                    "Session {} exceeded {} steps at {:?}, forcing finalize",
                    state.session_id,
                    MAX_STEPS,
                    node
                );
                node = Node::Finalize;
            }

            log::debug!("Session {} entering node {:?}", state.session_id, node);

            match node {
                Node::Router => {
                    state = self.router.route(state).await;
                    self.checkpoint(&state).await;
                    node = match state.router_decision.and_then(AgentKind::from_decision) {
                        Some(kind) => Node::Agent(kind),
                        None => Node::Finalize,
                    };
                }
                Node::Agent(kind) => {
                    state = self.run_agent(kind, state).await;
                    self.checkpoint(&state).await;
                    node = Node::RouterConfirmation;
                }
                Node::RouterConfirmation => {
                    let decision = confirmation::confirm(&mut state);
                    self.checkpoint(&state).await;
                    node = match decision {
                        GateDecision::Router => Node::Router,
                        GateDecision::HumanInteraction => Node::HumanInteraction,
                        GateDecision::Finalize => Node::Finalize,
                    };
                }
                Node::HumanInteraction => match human::enter(&mut state) {
                    HumanStep::Wait => {
                        self.checkpoint(&state).await;
                        let outcome = TurnOutcome::NeedsInput {
                            input_type: state.human_input_type,
                            prompt: state.human_input_prompt.clone().unwrap_or_default(),
                        };
                        return (state, outcome);
                    }
                    HumanStep::Resume => {
                        self.checkpoint(&state).await;
                        node = Node::ResumeAfterHuman;
                    }
                },
                Node::ResumeAfterHuman => match human::resume(&mut state) {
                    ResumeOutcome::Confirmed(pending) => {
                        if let Some(pending) = pending {
                            self.apply_confirmed(&mut state, pending).await;
                        }
                        self.checkpoint(&state).await;
                        node = Node::Router;
                    }
                    ResumeOutcome::Continue => {
                        self.checkpoint(&state).await;
                        node = Node::Router;
                    }
                    ResumeOutcome::Cancelled => {
                        self.checkpoint(&state).await;
                        return (state, TurnOutcome::Completed);
                    }
                },
                Node::Finalize => {
                    finalizer::finalize(&mut state);
                    self.checkpoint(&state).await;
                    return (state, TurnOutcome::Completed);
                }
            }
        }
    }

    async fn run_agent(&self, kind: AgentKind, state: WorkflowState) -> WorkflowState {
        let mut state = match self.agents.get(kind) {
            Some(agent) => agent.run(state).await,
            None => {
                log::error!("No agent registered for {:?}", kind);
                state
            }
        };
        state.completed_agents.push(kind.name().to_string());

        // A fresh profile proposal must pass through human confirmation
        // before anything is written
        if kind == AgentKind::ProfileUpdater
            && !state.profile_updated
            && state.pending_confirmation.is_none()
        {
            if let Some(result) = &state.profile_updates {
                if !result.updates.is_empty() {
                    state.pending_confirmation = Some(PendingConfirmation {
                        action: "profile_update".to_string(),
                        updates: result.updates.clone(),
                        prompt: confirmation_prompt(&result.updates),
                    });
                    state.requires_human_input = true;
                }
            }
        }

        state
    }

    /// Apply an approved proposal. Only profile updates are side-effecting
    /// today; store failures degrade the message and leave the profile flag
    /// unset rather than failing the turn.
    async fn apply_confirmed(&self, state: &mut WorkflowState, pending: PendingConfirmation) {
        if pending.action != "profile_update" {
            log::warn!(
                "Session {}: unknown confirmed action '{}'",
                state.session_id,
                pending.action
            );
            return;
        }

        state.user_profile_data.apply(&pending.updates);
        match self
            .store
            .save_profile(&state.session_id, &state.user_profile_data)
            .await
        {
            Ok(()) => {
                state.profile_updated = true;
            }
            Err(e) => {
                log::error!(
                    "Failed to persist profile for session {}: {}",
                    state.session_id,
                    e
                );
                if let Some(result) = &mut state.profile_updates {
                    result.message = STORE_DEGRADED_MESSAGE.to_string();
                }
            }
        }
    }

    async fn checkpoint(&self, state: &WorkflowState) {
        if let Err(e) = self.store.put_checkpoint(state).await {
            log::error!(
                "Checkpoint failed for session {} at stage {}: {}",
                state.session_id,
                state.workflow_stage.as_str(),
                e
            );
        }
    }
}

fn confirmation_prompt(delta: &ProfileDelta) -> String {
    let mut changes: Vec<String> = Vec::new();
    if !delta.skills.is_empty() {
        changes.push(format!("add skills: {}", delta.skills.join(", ")));
    }
    if !delta.experience.is_empty() {
        changes.push(format!(
            "add {} experience {}",
            delta.experience.len(),
            if delta.experience.len() == 1 {
                "entry"
            } else {
                "entries"
            }
        ));
    }
    if delta.about.is_some() {
        changes.push("update your about section".to_string());
    }
    if delta.headline.is_some() {
        changes.push("update your headline".to_string());
    }
    format!(
        "I'd like to update your profile: {}. Should I go ahead? (yes/no)",
        changes.join("; ")
    )
}
