// SPDX-License-Identifier: MIT

//! Session persistence
//!
//! [`SessionStore`] is the seam between the workflow and its persistence
//! backend: profiles, turn checkpoints, and conversation history all live
//! behind it. The in-memory implementation backs tests and single-process
//! deployments.

use crate::compass::profile::UserProfile;
use crate::compass::workflow::WorkflowState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// One completed exchange as persisted per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub message: String,
    pub response: String,
    pub agent_type: String,
    pub timestamp: DateTime<Utc>,
}

/// Persistence seam for profiles, checkpoints and chat history
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session around a profile and return its id
    async fn create_session(&self, profile: UserProfile) -> Result<String, StoreError>;

    async fn get_profile(&self, session_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Upsert: saving against an unknown session creates it
    async fn save_profile(
        &self,
        session_id: &str,
        profile: &UserProfile,
    ) -> Result<(), StoreError>;

    async fn get_checkpoint(&self, session_id: &str)
        -> Result<Option<WorkflowState>, StoreError>;

    async fn put_checkpoint(&self, state: &WorkflowState) -> Result<(), StoreError>;

    async fn append_history(
        &self,
        session_id: &str,
        entry: HistoryEntry,
    ) -> Result<(), StoreError>;

    /// Up to `limit` entries, newest first
    async fn get_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, StoreError>;
}

#[derive(Default)]
struct SessionRecord {
    profile: UserProfile,
    checkpoint: Option<WorkflowState>,
    history: Vec<HistoryEntry>,
}

/// Process-local store keyed by session id
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, profile: UserProfile) -> Result<String, StoreError> {
        let session_id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            session_id.clone(),
            SessionRecord {
                profile,
                ..Default::default()
            },
        );
        Ok(session_id)
    }

    async fn get_profile(&self, session_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).map(|record| record.profile.clone()))
    }

    async fn save_profile(
        &self,
        session_id: &str,
        profile: &UserProfile,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .profile = profile.clone();
        Ok(())
    }

    async fn get_checkpoint(
        &self,
        session_id: &str,
    ) -> Result<Option<WorkflowState>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .and_then(|record| record.checkpoint.clone()))
    }

    async fn put_checkpoint(&self, state: &WorkflowState) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(state.session_id.clone())
            .or_default()
            .checkpoint = Some(state.clone());
        Ok(())
    }

    async fn append_history(
        &self,
        session_id: &str,
        entry: HistoryEntry,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .history
            .push(entry);
        Ok(())
    }

    async fn get_history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .map(|record| {
                record
                    .history
                    .iter()
                    .rev()
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
