// SPDX-License-Identifier: MIT

//! Specialist agent capabilities
//!
//! Each specialist is an opaque capability behind the [`Agent`] trait: it
//! takes the turn state and returns it with its contribution filled in.
//! Failures are absorbed into fallback output inside the agent; the engine
//! owns the bookkeeping around each invocation.

pub mod career_path;
pub mod classifier;
pub mod content_enhancement;
pub mod job_fit;
pub mod profile_updater;

use crate::compass::error::CompassError;
use crate::compass::profile::UserProfile;
use crate::compass::workflow::state::{ChatTurn, RouterDecision, WorkflowState};
use crate::llm::ChatModel;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// The four specialist kinds the router can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    ProfileUpdater,
    JobFitAnalyst,
    CareerPath,
    ContentEnhancement,
}

impl AgentKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProfileUpdater => "profile_updater",
            Self::JobFitAnalyst => "job_fit_analyst",
            Self::CareerPath => "career_path",
            Self::ContentEnhancement => "content_enhancement",
        }
    }

    /// The specialist a router decision dispatches to, if any
    pub fn from_decision(decision: RouterDecision) -> Option<Self> {
        match decision {
            RouterDecision::ProfileUpdater => Some(Self::ProfileUpdater),
            RouterDecision::JobFitAnalyst => Some(Self::JobFitAnalyst),
            RouterDecision::CareerPath => Some(Self::CareerPath),
            RouterDecision::ContentEnhancement => Some(Self::ContentEnhancement),
            RouterDecision::End => None,
        }
    }
}

/// An opaque specialist capability
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Run the specialist over the turn state. Never fails: model errors are
    /// absorbed into a fallback message in the agent's output slot.
    async fn run(&self, state: WorkflowState) -> WorkflowState;
}

/// Classification verdict for one router visit
#[derive(Debug, Clone, PartialEq)]
pub struct RouteVerdict {
    /// Raw agent tag; the router validates it against the closed set
    pub agent: String,
    /// Whether the classifier expects more routing after the chosen agent
    pub needs_followup: bool,
}

/// Query classification capability consumed by the router
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        query: &str,
        history: &[ChatTurn],
        context: &UserProfile,
    ) -> Result<RouteVerdict, CompassError>;
}

/// The fixed set of specialists available to the engine
pub struct AgentRegistry {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Build the four LLM-backed specialists over a shared model
    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(profile_updater::ProfileUpdaterAgent::new(
            model.clone(),
        )));
        registry.register(Arc::new(job_fit::JobFitAnalystAgent::new(model.clone())));
        registry.register(Arc::new(career_path::CareerPathAgent::new(model.clone())));
        registry.register(Arc::new(
            content_enhancement::ContentEnhancementAgent::new(model),
        ));
        registry
    }

    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        self.agents.insert(agent.kind(), agent);
    }

    pub fn get(&self, kind: AgentKind) -> Option<Arc<dyn Agent>> {
        self.agents.get(&kind).cloned()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
