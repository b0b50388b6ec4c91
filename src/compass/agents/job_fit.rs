// SPDX-License-Identifier: MIT

//! Job-fit specialist
//!
//! Scores the user's profile against a job description embedded in their
//! message. Without a recognizable job description the agent answers with
//! guidance on how to provide one instead of guessing.

use crate::compass::agents::{classifier::strip_code_fence, Agent, AgentKind};
use crate::compass::profile::UserProfile;
use crate::compass::workflow::state::{JobFitAnalysis, JobFitReport, WorkflowState};
use crate::llm::{ChatMessage, ChatModel};
use async_trait::async_trait;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You compare a candidate's profile against a job description.
Respond with JSON only:
{"score": <0-100 fit score>, "summary": "<two or three sentences>", "missing_skills": [..], "enhancements": ["<profile improvement tips>"]}"#;

const NO_JOB_DESCRIPTION_GUIDANCE: &str = "I'd be happy to analyze how well your profile fits a role. Please paste the job description (or a link's key requirements) and I'll score the match, point out missing skills, and suggest profile improvements.";

const ANALYSIS_FALLBACK: &str = "I encountered an issue analyzing the job fit. Please try rephrasing your request or check if the job description is clear and complete.";

/// Phrases that mark a message as carrying a job description
const JOB_INDICATORS: [&str; 10] = [
    "job description",
    "requirements",
    "responsibilities",
    "qualifications",
    "skills required",
    "experience required",
    "we are looking for",
    "position",
    "role",
    "hiring",
];

pub struct JobFitAnalystAgent {
    model: Arc<dyn ChatModel>,
}

impl JobFitAnalystAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

/// A message counts as a job description if it uses hiring vocabulary or is
/// long enough to plausibly be a pasted posting
fn extract_job_description(query: &str) -> Option<&str> {
    let lowered = query.to_lowercase();
    let has_indicator = JOB_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator));
    if has_indicator || query.split_whitespace().count() >= 20 {
        Some(query)
    } else {
        None
    }
}

fn render_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    if let Some(headline) = &profile.headline {
        out.push_str(&format!("Headline: {headline}\n"));
    }
    if !profile.skills.is_empty() {
        out.push_str(&format!("Skills: {}\n", profile.skills.join(", ")));
    }
    for entry in &profile.experience {
        out.push_str(&format!("Experience: {} at {}\n", entry.title, entry.company));
    }
    if let Some(about) = &profile.about {
        out.push_str(&format!("About: {about}\n"));
    }
    out
}

fn fit_level(score: u8) -> &'static str {
    match score {
        80.. => "Strong Match",
        60..=79 => "Good Match",
        _ => "Needs Development",
    }
}

fn render_report(analysis: &JobFitAnalysis) -> String {
    let mut out = format!(
        "**Job Fit: {} ({}/100)**\n\n{}",
        fit_level(analysis.score),
        analysis.score,
        analysis.summary
    );
    if !analysis.missing_skills.is_empty() {
        out.push_str("\n\n**Skills to develop:**");
        for skill in &analysis.missing_skills {
            out.push_str(&format!("\n- {skill}"));
        }
    }
    if !analysis.enhancements.is_empty() {
        out.push_str("\n\n**Profile improvement tips:**");
        for tip in &analysis.enhancements {
            out.push_str(&format!("\n- {tip}"));
        }
    }
    out
}

#[async_trait]
impl Agent for JobFitAnalystAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::JobFitAnalyst
    }

    async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        state.agent_type = self.kind().name().to_string();

        let Some(job_description) = extract_job_description(&state.current_user_query) else {
            state.job_fit_analysis = Some(JobFitReport {
                message: NO_JOB_DESCRIPTION_GUIDANCE.to_string(),
                analysis: None,
            });
            return state;
        };

        let prompt = format!(
            "Candidate profile:\n{}\nJob description:\n{}",
            render_profile(&state.user_profile_data),
            job_description
        );
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        let report = match self.model.complete(&messages).await {
            Ok(raw) => match serde_json::from_str::<JobFitAnalysis>(strip_code_fence(&raw)) {
                Ok(analysis) => JobFitReport {
                    message: render_report(&analysis),
                    analysis: Some(analysis),
                },
                Err(e) => {
                    log::warn!(
                        "Unparseable job-fit reply for session {}: {}",
                        state.session_id,
                        e
                    );
                    JobFitReport {
                        message: ANALYSIS_FALLBACK.to_string(),
                        analysis: None,
                    }
                }
            },
            Err(e) => {
                log::warn!("Job-fit analysis failed for session {}: {}", state.session_id, e);
                JobFitReport {
                    message: ANALYSIS_FALLBACK.to_string(),
                    analysis: None,
                }
            }
        };

        state.job_fit_analysis = Some(report);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compass::error::CompassError;

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

    fn agent(reply: Result<&str, &str>) -> JobFitAnalystAgent {
        JobFitAnalystAgent::new(Arc::new(FixedModel {
            reply: reply.map(str::to_string).map_err(str::to_string),
        }))
    }

    fn state(query: &str) -> WorkflowState {
        WorkflowState::new("s1", UserProfile::default(), query, vec![])
    }

    #[test]
    fn test_job_description_detection() {
        assert!(extract_job_description("here is the job description: ...").is_some());
        assert!(extract_job_description("We are looking for a senior dev").is_some());
        let long = "word ".repeat(25);
        assert!(extract_job_description(&long).is_some());
        assert!(extract_job_description("how do I fit?").is_none());
    }

    #[test]
    fn test_fit_levels() {
        assert_eq!(fit_level(85), "Strong Match");
        assert_eq!(fit_level(60), "Good Match");
        assert_eq!(fit_level(30), "Needs Development");
    }

    #[tokio::test]
    async fn test_missing_job_description_yields_guidance() {
        let out = agent(Ok("unused")).run(state("am I a good fit?")).await;
        let report = out.job_fit_analysis.unwrap();
        assert_eq!(report.message, NO_JOB_DESCRIPTION_GUIDANCE);
        assert!(report.analysis.is_none());
    }

    #[tokio::test]
    async fn test_valid_analysis_is_rendered() {
        let reply = r#"{"score": 82, "summary": "Strong backend profile.", "missing_skills": ["Go"], "enhancements": ["Quantify impact"]}"#;
        let out = agent(Ok(reply))
            .run(state("job description: senior backend engineer"))
            .await;
        let report = out.job_fit_analysis.unwrap();
        assert!(report.message.contains("Strong Match"));
        assert!(report.message.contains("- Go"));
        assert_eq!(report.analysis.unwrap().score, 82);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let out = agent(Err("timeout"))
            .run(state("job description: data analyst"))
            .await;
        let report = out.job_fit_analysis.unwrap();
        assert_eq!(report.message, ANALYSIS_FALLBACK);
        assert!(report.analysis.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let out = agent(Ok("you'd be great for this!"))
            .run(state("job description: data analyst"))
            .await;
        assert_eq!(out.job_fit_analysis.unwrap().message, ANALYSIS_FALLBACK);
    }
}
