// SPDX-License-Identifier: MIT

//! The turn state machine
//!
//! One user message makes one turn: Router -> (agent)* -> confirmation gate
//! -> {Router | human interaction | finalize}. The engine drives the nodes,
//! checkpoints state after every transition, and suspends at the
//! human-interaction node until the caller supplies input.

pub mod confirmation;
pub mod engine;
pub mod finalizer;
pub mod human;
pub mod router;
pub mod state;

pub use engine::{Node, TurnOutcome, WorkflowEngine};
pub use state::WorkflowState;
