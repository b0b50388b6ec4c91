// SPDX-License-Identifier: MIT

//! Career-path specialist
//!
//! Produces growth guidance from the profile and conversation, plus a short
//! list of upskilling areas harvested from the guidance text.

use crate::compass::agents::{Agent, AgentKind};
use crate::compass::profile::UserProfile;
use crate::compass::workflow::state::{render_history, CareerPathReport, WorkflowState};
use crate::llm::{ChatMessage, ChatModel};
use async_trait::async_trait;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are a career coach. Using the candidate's profile and question, give practical, specific career guidance: likely next roles, skills to build, and concrete steps. Keep it under 300 words and write directly to the user."#;

const GUIDANCE_FALLBACK: &str = "I'm having trouble generating personalized guidance right now. In the meantime: review job postings for roles one step ahead of yours, note the skills they repeat, and pick one to start building this month. Ask me again shortly and I'll tailor a plan to your profile.";

/// Skill names scanned for in guidance text to surface upskilling areas
const KNOWN_AREAS: [&str; 14] = [
    "leadership",
    "communication",
    "cloud",
    "kubernetes",
    "python",
    "rust",
    "machine learning",
    "data analysis",
    "system design",
    "architecture",
    "devops",
    "security",
    "project management",
    "mentoring",
];

const DEFAULT_AREAS: [&str; 3] = ["leadership", "communication", "system design"];

const MAX_AREAS: usize = 5;

pub struct CareerPathAgent {
    model: Arc<dyn ChatModel>,
}

impl CareerPathAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

/// Rough tenure estimate: parse "N year" durations, fall back to two years
/// per listed position
fn estimate_experience_years(profile: &UserProfile) -> u32 {
    let mut parsed_total: u32 = 0;
    let mut parsed_any = false;
    for entry in &profile.experience {
        if let Some(duration) = &entry.duration {
            let lowered = duration.to_lowercase();
            if let Some(idx) = lowered.find("year") {
                let digits: String = lowered[..idx]
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect();
                if let Ok(years) = digits.parse::<u32>() {
                    parsed_total += years;
                    parsed_any = true;
                }
            }
        }
    }
    if parsed_any {
        parsed_total
    } else {
        profile.experience.len() as u32 * 2
    }
}

fn extract_upskilling_areas(guidance: &str) -> Vec<String> {
    let lowered = guidance.to_lowercase();
    let mut areas: Vec<String> = KNOWN_AREAS
        .iter()
        .filter(|area| lowered.contains(*area))
        .map(|area| area.to_string())
        .collect();
    if areas.is_empty() {
        areas = DEFAULT_AREAS.iter().map(|a| a.to_string()).collect();
    }
    areas.truncate(MAX_AREAS);
    areas
}

fn render_profile(profile: &UserProfile) -> String {
    let mut out = format!(
        "Experience: roughly {} years across {} positions\n",
        estimate_experience_years(profile),
        profile.experience.len()
    );
    if let Some(headline) = &profile.headline {
        out.push_str(&format!("Headline: {headline}\n"));
    }
    if !profile.skills.is_empty() {
        out.push_str(&format!("Skills: {}\n", profile.skills.join(", ")));
    }
    for entry in &profile.experience {
        out.push_str(&format!("- {} at {}\n", entry.title, entry.company));
    }
    out
}

#[async_trait]
impl Agent for CareerPathAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::CareerPath
    }

    async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        state.agent_type = self.kind().name().to_string();

        let mut prompt = format!(
            "Profile:\n{}\nQuestion: {}",
            render_profile(&state.user_profile_data),
            state.current_user_query
        );
        let history = state.recent_history(4);
        if !history.is_empty() {
            prompt.push_str(&format!(
                "\n\nRecent conversation:\n{}",
                render_history(history)
            ));
        }
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        let report = match self.model.complete(&messages).await {
            Ok(guidance) => CareerPathReport {
                upskilling_areas: extract_upskilling_areas(&guidance),
                message: guidance,
            },
            Err(e) => {
                log::warn!(
                    "Career guidance failed for session {}: {}",
                    state.session_id,
                    e
                );
                CareerPathReport {
                    message: GUIDANCE_FALLBACK.to_string(),
                    upskilling_areas: DEFAULT_AREAS.iter().map(|a| a.to_string()).collect(),
                }
            }
        };

        state.career_path_response = Some(report);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::error::CompassError;
    use crate::compass::profile::ExperienceEntry;

    struct FixedModel {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl ChatModel for FixedModel {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, CompassError> {
            self.reply
                .clone()
                .map_err(|e| CompassError::model("mock", e))
        }
    }

    fn agent(reply: Result<&str, &str>) -> CareerPathAgent {
        CareerPathAgent::new(Arc::new(FixedModel {
            reply: reply.map(str::to_string).map_err(str::to_string),
        }))
    }

    fn exp(duration: Option<&str>) -> ExperienceEntry {
        ExperienceEntry {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            duration: duration.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn test_experience_years_from_durations() {
        let profile = UserProfile {
            experience: vec![exp(Some("3 years")), exp(Some("2 Years"))],
            ..Default::default()
        };
        assert_eq!(estimate_experience_years(&profile), 5);
    }

    #[test]
    fn test_experience_years_fallback_per_position() {
        let profile = UserProfile {
            experience: vec![exp(None), exp(Some("a while"))],
            ..Default::default()
        };
        assert_eq!(estimate_experience_years(&profile), 4);
    }

    #[test]
    fn test_upskilling_areas_harvested_and_capped() {
        let guidance = "Focus on leadership, cloud, Kubernetes, Python, security and DevOps work.";
        let areas = extract_upskilling_areas(guidance);
        assert_eq!(areas.len(), MAX_AREAS);
        assert!(areas.contains(&"leadership".to_string()));
    }

    #[test]
    fn test_upskilling_areas_default_when_none_found() {
        assert_eq!(extract_upskilling_areas("just keep going"), DEFAULT_AREAS);
    }

    #[tokio::test]
    async fn test_guidance_fills_output_slot() {
        let out = agent(Ok("Build system design depth and mentoring skills."))
            .run(WorkflowState::new(
                "s1",
                UserProfile::default(),
                "what next?",
                vec![],
            ))
            .await;
        let report = out.career_path_response.unwrap();
        assert!(report.message.contains("system design"));
        assert!(report.upskilling_areas.contains(&"mentoring".to_string()));
        assert_eq!(out.agent_type, "career_path");
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let out = agent(Err("timeout"))
            .run(WorkflowState::new(
                "s1",
                UserProfile::default(),
                "what next?",
                vec![],
            ))
            .await;
        let report = out.career_path_response.unwrap();
        assert_eq!(report.message, GUIDANCE_FALLBACK);
        assert_eq!(report.upskilling_areas.len(), DEFAULT_AREAS.len());
    }
}
