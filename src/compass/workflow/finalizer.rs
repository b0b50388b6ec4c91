// SPDX-License-Identifier: MIT

//! Finalizer node
//!
//! Aggregates the agent output slots into the single user-facing response
//! and marks the turn completed. Slot order is fixed so multi-agent turns
//! always read the same way.

use crate::compass::workflow::state::{WorkflowStage, WorkflowState};

const GENERIC_COMPLETION: &str =
    "I've processed your request. Is there anything else you'd like help with?";

/// Assemble `final_response` from whichever output slots are populated.
/// Idempotent: a second pass over the same state produces the same response.
pub fn finalize(state: &mut WorkflowState) {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(updates) = &state.profile_updates {
        if !updates.message.is_empty() {
            parts.push(&updates.message);
        }
    }
    if let Some(report) = &state.job_fit_analysis {
        if !report.message.is_empty() {
            parts.push(&report.message);
        }
    }
    if let Some(report) = &state.career_path_response {
        if !report.message.is_empty() {
            parts.push(&report.message);
        }
    }
    if let Some(enhancement) = &state.content_enhancement_result {
        if !enhancement.is_empty() {
            parts.push(enhancement);
        }
    }

    if parts.is_empty() {
        if state.final_response.is_empty() {
            state.final_response = GENERIC_COMPLETION.to_string();
        }
    } else {
        state.final_response = parts.join("\n\n");
    }

    state.workflow_stage = WorkflowStage::Completed;
}
