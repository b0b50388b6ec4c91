// SPDX-License-Identifier: MIT

pub mod agents;
pub mod error;
pub mod orchestrator;
pub mod profile;
pub mod server;
pub mod store;
pub mod workflow;
