//! End-to-end turns through the orchestrator with a scripted model

use async_trait::async_trait;
use compass_rs::compass::agents::classifier::LlmClassifier;
use compass_rs::compass::agents::AgentRegistry;
use compass_rs::compass::error::CompassError;
use compass_rs::compass::orchestrator::{ChatOutcome, Orchestrator};
use compass_rs::compass::profile::UserProfile;
use compass_rs::compass::store::{InMemorySessionStore, SessionStore};
use compass_rs::llm::{ChatMessage, ChatModel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Components
// ============================================================================

/// Replays a fixed queue of model replies, one per completion call
struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
        })
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CompassError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CompassError::model("scripted", "no replies left"))
    }
}

struct Harness {
    orchestrator: Orchestrator,
    store: Arc<InMemorySessionStore>,
    session_id: String,
}

async fn harness(replies: &[&str], profile: UserProfile) -> Harness {
    let store = Arc::new(InMemorySessionStore::new());
    let model = ScriptedModel::new(replies);
    let classifier = Arc::new(LlmClassifier::new(model.clone()));
    let agents = AgentRegistry::with_model(model);
    let orchestrator = Orchestrator::new(classifier, agents, store.clone());
    let session_id = store.create_session(profile).await.unwrap();
    Harness {
        orchestrator,
        store,
        session_id,
    }
}

async fn send(h: &Harness, message: &str, resume: bool) -> ChatOutcome {
    h.orchestrator
        .process_turn(&h.session_id, message, None, resume)
        .await
}

// ============================================================================
// Turn Scenarios
// ============================================================================

#[tokio::test]
async fn test_profile_update_confirm_and_apply() {
    let h = harness(
        &[
            r#"{"agent": "profile_updater", "needs_followup": false}"#,
            r#"{"has_updates": true, "updates": {"skills": ["Kubernetes"]}}"#,
        ],
        UserProfile::default(),
    )
    .await;

    let outcome = send(&h, "I just got my CKA, add Kubernetes to my skills", false).await;
    assert!(outcome.requires_input);
    assert_eq!(outcome.input_type.as_deref(), Some("confirmation"));
    assert_eq!(outcome.workflow_stage, "awaiting_confirmation");
    assert!(outcome.message.contains("Kubernetes"));
    assert!(!outcome.profile_updated);

    let outcome = send(&h, "yes", true).await;
    assert!(!outcome.requires_input);
    assert_eq!(outcome.workflow_stage, "completed");
    assert!(outcome.profile_updated);

    let profile = h.store.get_profile(&h.session_id).await.unwrap().unwrap();
    assert!(profile.skills.contains(&"Kubernetes".to_string()));
}

#[tokio::test]
async fn test_profile_update_rejected_leaves_profile_untouched() {
    let h = harness(
        &[
            r#"{"agent": "profile_updater", "needs_followup": false}"#,
            r#"{"has_updates": true, "updates": {"skills": ["Kubernetes"]}}"#,
        ],
        UserProfile::default(),
    )
    .await;

    let outcome = send(&h, "add Kubernetes to my skills", false).await;
    assert!(outcome.requires_input);

    let outcome = send(&h, "no thanks", true).await;
    assert!(!outcome.requires_input);
    assert_eq!(outcome.workflow_stage, "cancelled");
    assert!(!outcome.profile_updated);
    assert!(outcome.message.contains("left your profile unchanged"));

    let profile = h.store.get_profile(&h.session_id).await.unwrap().unwrap();
    assert!(profile.skills.is_empty());
}

#[tokio::test]
async fn test_career_guidance_completes_in_one_pass() {
    let h = harness(
        &[
            r#"{"agent": "career_path", "needs_followup": false}"#,
            "Aim for a staff engineer role; build system design depth.",
        ],
        UserProfile::default(),
    )
    .await;

    let outcome = send(&h, "where should my career go next?", false).await;
    assert!(!outcome.requires_input);
    assert_eq!(outcome.workflow_stage, "completed");
    assert_eq!(outcome.agent_type, "career_path");
    assert!(outcome.message.contains("staff engineer"));
    let career = outcome.career_path.unwrap();
    assert!(career
        .upskilling_areas
        .contains(&"system design".to_string()));
}

#[tokio::test]
async fn test_resume_without_pending_interrupt_is_a_fresh_turn() {
    let h = harness(
        &[
            r#"{"agent": "career_path", "needs_followup": false}"#,
            "Keep building depth in your current role.",
        ],
        UserProfile::default(),
    )
    .await;

    let outcome = send(&h, "what should I do next?", true).await;
    assert!(!outcome.requires_input);
    assert_eq!(outcome.workflow_stage, "completed");
    assert!(outcome.message.contains("Keep building depth"));
}

#[tokio::test]
async fn test_multi_agent_chain_trips_review_breaker() {
    // First agent extracts nothing and reroutes; the second completes, at
    // which point two executed agents trip the review gate.
    let h = harness(
        &[
            r#"{"agent": "profile_updater", "needs_followup": false}"#,
            r#"{"has_updates": false, "updates": {}}"#,
            r#"{"agent": "career_path", "needs_followup": false}"#,
            "Some guidance.",
        ],
        UserProfile::default(),
    )
    .await;

    let outcome = send(&h, "update my profile and tell me what's next", false).await;
    assert!(outcome.requires_input);
    assert_eq!(outcome.input_type.as_deref(), Some("review"));
    assert_eq!(outcome.workflow_stage, "awaiting_input");
}

#[tokio::test]
async fn test_unknown_classifier_tag_defaults_to_career_path() {
    let h = harness(
        &[
            r#"{"agent": "resume_writer", "needs_followup": false}"#,
            "Default guidance.",
        ],
        UserProfile::default(),
    )
    .await;

    let outcome = send(&h, "help me out", false).await;
    assert_eq!(outcome.agent_type, "career_path");
    assert_eq!(outcome.workflow_stage, "completed");
    assert!(outcome.message.contains("Default guidance."));
}

#[tokio::test]
async fn test_routing_history_records_every_router_visit() {
    let h = harness(
        &[
            r#"{"agent": "profile_updater", "needs_followup": false}"#,
            r#"{"has_updates": true, "updates": {"skills": ["Rust"]}}"#,
        ],
        UserProfile::default(),
    )
    .await;

    send(&h, "I picked up Rust", false).await;
    send(&h, "yes", true).await;

    // First visit classified the query; the second ended the confirmed turn
    let checkpoint = h
        .store
        .get_checkpoint(&h.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(checkpoint.routing_history.len(), 2);
    assert_eq!(checkpoint.routing_history[0].decision, "profile_updater");
    assert_eq!(checkpoint.routing_history[1].decision, "end");
}

#[tokio::test]
async fn test_unknown_session_yields_error_outcome() {
    let h = harness(&[], UserProfile::default()).await;

    let outcome = h
        .orchestrator
        .process_turn("no-such-session", "hello", None, false)
        .await;
    assert_eq!(outcome.agent_type, "error");
    assert_eq!(outcome.workflow_stage, "error");
    assert!(outcome.message.contains("try again"));
}

#[tokio::test]
async fn test_completed_turns_land_in_chat_history() {
    let h = harness(
        &[
            r#"{"agent": "career_path", "needs_followup": false}"#,
            "Guidance one.",
            r#"{"agent": "career_path", "needs_followup": false}"#,
            "Guidance two.",
        ],
        UserProfile::default(),
    )
    .await;

    send(&h, "first question", false).await;
    send(&h, "second question", false).await;

    let history = h.store.get_history(&h.session_id, 10).await.unwrap();
    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0].message, "second question");
    assert_eq!(history[0].response, "Guidance two.");
    assert_eq!(history[0].agent_type, "career_path");
}

#[tokio::test]
async fn test_job_fit_without_description_returns_guidance() {
    let h = harness(
        &[r#"{"agent": "job_fit_analyst", "needs_followup": false}"#],
        UserProfile::default(),
    )
    .await;

    // No second reply scripted: the agent never calls the model without a
    // job description to analyze.
    let outcome = send(&h, "am I a good fit?", false).await;
    assert_eq!(outcome.workflow_stage, "completed");
    assert!(outcome.message.contains("paste the job description"));
    assert!(outcome.job_fit_analysis.unwrap().analysis.is_none());
}
