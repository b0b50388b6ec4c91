// SPDX-License-Identifier: MIT

//! User profile records and the merge rules for proposed updates

use serde::{Deserialize, Serialize};

/// A user's professional profile, owned by the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

/// One position in the experience section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry in the education section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

/// A proposed set of profile changes. Never applied directly by an agent;
/// the engine writes it through the store only after human confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDelta {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
}

impl ProfileDelta {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
            && self.experience.is_empty()
            && self.about.is_none()
            && self.headline.is_none()
    }
}

impl UserProfile {
    /// Merge a confirmed delta into the profile.
    ///
    /// Skills are a union that preserves existing order and skips duplicates
    /// (case-insensitive). Experience entries are appended. `about` and
    /// `headline` overwrite when present.
    pub fn apply(&mut self, delta: &ProfileDelta) {
        for skill in &delta.skills {
            let exists = self
                .skills
                .iter()
                .any(|s| s.eq_ignore_ascii_case(skill.trim()));
            if !exists && !skill.trim().is_empty() {
                self.skills.push(skill.trim().to_string());
            }
        }
        self.experience.extend(delta.experience.iter().cloned());
        if let Some(about) = &delta.about {
            self.about = Some(about.clone());
        }
        if let Some(headline) = &delta.headline {
            self.headline = Some(headline.clone());
        }
    }
}
