// SPDX-License-Identifier: MIT

//! Router-confirmation gate
//!
//! Runs after every agent. Two-tier policy, in priority order: an explicit
//! confirmation request from an agent always wins; otherwise a circuit
//! breaker interrupts runaway multi-agent chains; otherwise the turn follows
//! the router's plan.

use crate::compass::workflow::state::{HumanInputType, NextStep, WorkflowStage, WorkflowState};

/// Agent executions after which the gate demands a human review
const MULTI_AGENT_LIMIT: usize = 2;

/// Fixed prompt for the multi-agent circuit breaker
pub const REVIEW_PROMPT: &str =
    "I've completed several steps on this request. Should I keep going, or is this enough for now?";

/// Where the gate sends the turn next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Router,
    HumanInteraction,
    Finalize,
}

pub fn confirm(state: &mut WorkflowState) -> GateDecision {
    // Tier 1: an agent asked for explicit approval of a side-effecting change
    if state.pending_confirmation.is_some() {
        state.requires_human_input = true;
        state.human_input_type = HumanInputType::Confirmation;
        state.workflow_stage = WorkflowStage::AwaitingConfirmation;
        return GateDecision::HumanInteraction;
    }

    // Tier 2: circuit breaker, independent of any single agent's opinion
    if state.completed_agents.len() >= MULTI_AGENT_LIMIT {
        state.requires_human_input = true;
        state.human_input_type = HumanInputType::Review;
        state.human_input_prompt = Some(REVIEW_PROMPT.to_string());
        return GateDecision::HumanInteraction;
    }

    // Tier 3: follow the router's plan
    match state.next_agent {
        NextStep::Router => GateDecision::Router,
        NextStep::End => GateDecision::Finalize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::profile::{ProfileDelta, UserProfile};
    use crate::compass::workflow::state::PendingConfirmation;

    fn state() -> WorkflowState {
        WorkflowState::new("s1", UserProfile::default(), "query", vec![])
    }

    fn pending() -> PendingConfirmation {
        PendingConfirmation {
            action: "profile_update".to_string(),
            updates: ProfileDelta::default(),
            prompt: "Apply these updates?".to_string(),
        }
    }

    #[test]
    fn test_pending_confirmation_forces_interrupt() {
        let mut s = state();
        s.pending_confirmation = Some(pending());
        assert_eq!(confirm(&mut s), GateDecision::HumanInteraction);
        assert!(s.requires_human_input);
        assert_eq!(s.human_input_type, HumanInputType::Confirmation);
        assert_eq!(s.workflow_stage, WorkflowStage::AwaitingConfirmation);
    }

    #[test]
    fn test_confirmation_outranks_circuit_breaker() {
        let mut s = state();
        s.pending_confirmation = Some(pending());
        s.completed_agents = vec!["career_path".to_string(), "job_fit_analyst".to_string()];
        assert_eq!(confirm(&mut s), GateDecision::HumanInteraction);
        // Explicit approval request wins over the agent-count breaker
        assert_eq!(s.human_input_type, HumanInputType::Confirmation);
    }

    #[test]
    fn test_circuit_breaker_after_two_agents() {
        let mut s = state();
        s.completed_agents = vec!["profile_updater".to_string(), "career_path".to_string()];
        assert_eq!(confirm(&mut s), GateDecision::HumanInteraction);
        assert_eq!(s.human_input_type, HumanInputType::Review);
        assert_eq!(s.human_input_prompt.as_deref(), Some(REVIEW_PROMPT));
    }

    #[test]
    fn test_single_agent_follows_router_plan() {
        let mut s = state();
        s.completed_agents = vec!["career_path".to_string()];
        s.next_agent = NextStep::End;
        assert_eq!(confirm(&mut s), GateDecision::Finalize);

        s.next_agent = NextStep::Router;
        assert_eq!(confirm(&mut s), GateDecision::Router);
        assert!(!s.requires_human_input);
    }
}
