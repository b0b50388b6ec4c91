// SPDX-License-Identifier: MIT

//! Router node
//!
//! Classifies the active query into the next step and appends one record to
//! the routing history per visit. Classification is a total function over
//! arbitrary classifier output: anything outside the closed decision set,
//! including a classifier error, becomes the `career_path` default.

use crate::compass::agents::Classifier;
use crate::compass::workflow::state::{
    NextStep, RouterDecision, RoutingRecord, WorkflowStage, WorkflowState,
};
use std::sync::Arc;

/// Fallback decision for malformed or failed classification
const DEFAULT_DECISION: RouterDecision = RouterDecision::CareerPath;

/// Window of chat turns handed to the classifier as context
const CLASSIFIER_HISTORY_WINDOW: usize = 4;

pub struct Router {
    classifier: Arc<dyn Classifier>,
}

impl Router {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Route one visit. Resumed human answers are promoted into the active
    /// query before classification so they are treated as a fresh query.
    pub async fn route(&self, mut state: WorkflowState) -> WorkflowState {
        if let Some(input) = state.human_input_received.take() {
            state.current_user_query = input;
        }

        let mut needs_followup = false;
        let decision = if state.workflow_stage == WorkflowStage::Confirmed {
            // A confirmed proposal ends the turn through the finalizer; the
            // affirmative answer is not a query worth classifying.
            RouterDecision::End
        } else {
            match self
                .classifier
                .classify(
                    &state.current_user_query,
                    state.recent_history(CLASSIFIER_HISTORY_WINDOW),
                    &state.user_profile_data,
                )
                .await
            {
                Ok(verdict) => {
                    needs_followup = verdict.needs_followup;
                    match RouterDecision::parse(&verdict.agent) {
                        Some(decision) => decision,
                        None => {
                            log::warn!(
                                "Classifier returned unknown agent '{}', defaulting to {}",
                                verdict.agent,
                                DEFAULT_DECISION.as_str()
                            );
                            DEFAULT_DECISION
                        }
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Classification failed for session {}: {}, defaulting to {}",
                        state.session_id,
                        e,
                        DEFAULT_DECISION.as_str()
                    );
                    DEFAULT_DECISION
                }
            }
        };

        state.router_decision = Some(decision);
        state.agent_type = decision.as_str().to_string();
        state.next_agent = if needs_followup {
            NextStep::Router
        } else {
            NextStep::End
        };

        // One audit record per visit, regardless of outcome
        state.routing_history.push(RoutingRecord {
            query: state.current_user_query.clone(),
            decision: decision.as_str().to_string(),
            stage: state.workflow_stage.as_str().to_string(),
        });

        state
    }
}
