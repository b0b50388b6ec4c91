// SPDX-License-Identifier: MIT

//! compass-rs: a career-coaching chat service built around a checkpointed
//! multi-agent workflow engine.

pub mod compass;
pub mod llm;
