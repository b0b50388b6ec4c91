// SPDX-License-Identifier: MIT

//! Human-interaction node and resume processing
//!
//! Entry is a genuine suspension point: without input the turn halts here
//! and the caller is handed a pending-input descriptor. Once input arrives,
//! resume processing interprets confirmation answers and hands control back
//! to the router, except for a rejected confirmation, which terminates the
//! turn with a fixed cancellation message.

use crate::compass::workflow::state::{
    HumanInputType, PendingConfirmation, WorkflowStage, WorkflowState,
};

/// Written into `final_response` on a rejected confirmation, bypassing the
/// finalizer's aggregation
pub const CANCELLATION_MESSAGE: &str =
    "No problem, I've left your profile unchanged. Let me know if there's anything else you'd like to work on.";

const CONFIRMATION_FALLBACK_PROMPT: &str =
    "I have changes ready to apply to your profile. Should I go ahead? (yes/no)";
const CLARIFICATION_PROMPT: &str = "Could you clarify what you'd like me to do next?";
const GENERIC_PROMPT: &str = "How should I proceed?";

const AFFIRMATIVE_ANSWERS: [&str; 4] = ["yes", "confirm", "proceed", "y"];

/// What entering the node produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanStep {
    /// No input yet: suspend, checkpoint, return control to the caller
    Wait,
    /// Input is present: continue into resume processing
    Resume,
}

/// Where resume processing sends the turn
#[derive(Debug, PartialEq)]
pub enum ResumeOutcome {
    /// Affirmative confirmation; carries the proposal for the engine to apply
    Confirmed(Option<PendingConfirmation>),
    /// Non-confirmation input types: back to the router
    Continue,
    /// Rejected confirmation: terminal short-circuit
    Cancelled,
}

pub fn enter(state: &mut WorkflowState) -> HumanStep {
    if state
        .human_input_prompt
        .as_deref()
        .map_or(true, str::is_empty)
    {
        state.human_input_prompt = Some(synthesize_prompt(state));
    }
    // The confirmation gate's more specific stage survives entry
    if state.workflow_stage != WorkflowStage::AwaitingConfirmation {
        state.workflow_stage = WorkflowStage::AwaitingInput;
    }
    state.requires_human_input = true;

    if state.human_input_received.is_some() {
        HumanStep::Resume
    } else {
        HumanStep::Wait
    }
}

fn synthesize_prompt(state: &WorkflowState) -> String {
    match state.human_input_type {
        HumanInputType::Confirmation => state
            .pending_confirmation
            .as_ref()
            .map(|pending| pending.prompt.clone())
            .unwrap_or_else(|| CONFIRMATION_FALLBACK_PROMPT.to_string()),
        HumanInputType::Clarification => CLARIFICATION_PROMPT.to_string(),
        _ => GENERIC_PROMPT.to_string(),
    }
}

pub fn is_affirmative(input: &str) -> bool {
    AFFIRMATIVE_ANSWERS.contains(&input.trim().to_lowercase().as_str())
}

/// Process the received input. The input itself stays on the state so the
/// router can promote it into the active query; all other human-interaction
/// scratch fields are cleared unconditionally.
pub fn resume(state: &mut WorkflowState) -> ResumeOutcome {
    let outcome = if state.human_input_type == HumanInputType::Confirmation {
        let answer = state.human_input_received.clone().unwrap_or_default();
        if is_affirmative(&answer) {
            state.workflow_stage = WorkflowStage::Confirmed;
            ResumeOutcome::Confirmed(state.pending_confirmation.take())
        } else {
            state.workflow_stage = WorkflowStage::Cancelled;
            state.final_response = CANCELLATION_MESSAGE.to_string();
            ResumeOutcome::Cancelled
        }
    } else {
        state.workflow_stage = WorkflowStage::Processing;
        ResumeOutcome::Continue
    };

    state.requires_human_input = false;
    state.human_input_type = HumanInputType::None;
    state.human_input_prompt = None;
    state.pending_confirmation = None;

    outcome
}
