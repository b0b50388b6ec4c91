// SPDX-License-Identifier: MIT

//! The state record threaded through every node of one turn
//!
//! A serialized snapshot of [`WorkflowState`] is the checkpoint: it is the
//! unit of persistence and of resumability across process boundaries.

use crate::compass::profile::{ProfileDelta, UserProfile};
use serde::{Deserialize, Serialize};

/// Role of a chat history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

/// One prior exchange in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// Render chat turns as plain text for prompt context
pub fn render_history(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::Human => "human",
                Role::Ai => "ai",
            };
            format!("{}: {}", role, turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The closed set of router decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterDecision {
    ProfileUpdater,
    JobFitAnalyst,
    CareerPath,
    ContentEnhancement,
    End,
}

impl RouterDecision {
    /// Parse a raw classifier tag. Anything outside the closed set is `None`;
    /// the router maps that to its default rather than erroring.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "profile_updater" => Some(Self::ProfileUpdater),
            "job_fit_analyst" => Some(Self::JobFitAnalyst),
            "career_path" => Some(Self::CareerPath),
            "content_enhancement" => Some(Self::ContentEnhancement),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfileUpdater => "profile_updater",
            Self::JobFitAnalyst => "job_fit_analyst",
            Self::CareerPath => "career_path",
            Self::ContentEnhancement => "content_enhancement",
            Self::End => "end",
        }
    }
}

/// Externally visible stage of the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Processing,
    AwaitingConfirmation,
    AwaitingInput,
    Confirmed,
    Cancelled,
    Completed,
    Error,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::AwaitingInput => "awaiting_input",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

/// Kind of input the human-interaction node is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanInputType {
    Confirmation,
    Clarification,
    Review,
    None,
}

impl HumanInputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmation => "confirmation",
            Self::Clarification => "clarification",
            Self::Review => "review",
            Self::None => "none",
        }
    }
}

/// The step the router planned for after the current agent completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Router,
    End,
}

/// One routing-history record, appended at every router visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRecord {
    pub query: String,
    pub decision: String,
    pub stage: String,
}

/// A proposal awaiting human approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub action: String,
    pub updates: ProfileDelta,
    pub prompt: String,
}

/// Output of the profile-updater specialist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdateResult {
    pub updates: ProfileDelta,
    pub message: String,
}

/// Structured job-fit assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitAnalysis {
    pub score: u8,
    pub summary: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub enhancements: Vec<String>,
}

/// Output of the job-fit specialist: the user-facing text plus the
/// structured assessment when one was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFitReport {
    pub message: String,
    #[serde(default)]
    pub analysis: Option<JobFitAnalysis>,
}

/// Output of the career-path specialist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPathReport {
    pub message: String,
    #[serde(default)]
    pub upskilling_areas: Vec<String>,
}

/// The single mutable record threaded through every node of one turn.
///
/// The engine passes it by value into each node and merges the returned
/// value back into the session checkpoint; nodes never share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub session_id: String,
    pub user_profile_data: UserProfile,
    pub current_user_query: String,
    /// Append-only within a turn; bounded only when first loaded from storage
    pub chat_history: Vec<ChatTurn>,

    pub agent_type: String,
    pub router_decision: Option<RouterDecision>,
    pub next_agent: NextStep,

    /// One entry per router visit, append-only
    pub routing_history: Vec<RoutingRecord>,
    /// Agent names that executed this turn, append-only
    pub completed_agents: Vec<String>,

    pub job_fit_analysis: Option<JobFitReport>,
    pub career_path_response: Option<CareerPathReport>,
    pub profile_updates: Option<ProfileUpdateResult>,
    pub content_enhancement_result: Option<String>,

    /// Written only by the finalizer or the cancellation shortcut
    pub final_response: String,
    /// True only after an applied-and-confirmed profile change
    pub profile_updated: bool,

    pub requires_human_input: bool,
    pub human_input_type: HumanInputType,
    pub human_input_prompt: Option<String>,
    pub human_input_received: Option<String>,
    pub pending_confirmation: Option<PendingConfirmation>,

    pub workflow_stage: WorkflowStage,
}

impl WorkflowState {
    /// Seed a fresh turn
    pub fn new(
        session_id: impl Into<String>,
        profile: UserProfile,
        query: impl Into<String>,
        chat_history: Vec<ChatTurn>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_profile_data: profile,
            current_user_query: query.into(),
            chat_history,
            agent_type: String::new(),
            router_decision: None,
            next_agent: NextStep::End,
            routing_history: Vec::new(),
            completed_agents: Vec::new(),
            job_fit_analysis: None,
            career_path_response: None,
            profile_updates: None,
            content_enhancement_result: None,
            final_response: String::new(),
            profile_updated: false,
            requires_human_input: false,
            human_input_type: HumanInputType::None,
            human_input_prompt: None,
            human_input_received: None,
            pending_confirmation: None,
            workflow_stage: WorkflowStage::Processing,
        }
    }

    /// The last `n` chat turns, for prompt context
    pub fn recent_history(&self, n: usize) -> &[ChatTurn] {
        let start = self.chat_history.len().saturating_sub(n);
        &self.chat_history[start..]
    }
}
