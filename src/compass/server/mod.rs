// SPDX-License-Identifier: MIT

//! HTTP surface for session lifecycle and chat

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use url::Url;

use crate::compass::orchestrator::Orchestrator;
use crate::compass::profile::UserProfile;
use crate::compass::store::SessionStore;

const SESSION_NOT_FOUND: &str = "Session not found. Please start a new session.";

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn SessionStore>,
}

pub async fn serve(
    port: u16,
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn SessionStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState {
        orchestrator,
        store,
    };

    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/sessions", post(start_session))
        .route("/api/chat", post(chat))
        .route("/api/profile/{session_id}", get(get_profile))
        .route("/api/chat_history/{session_id}", get(get_chat_history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
struct StartSessionRequest {
    #[serde(default)]
    linkedin_url: Option<String>,
    #[serde(default)]
    profile: Option<UserProfile>,
}

fn valid_linkedin_url(raw: &str) -> bool {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.contains("linkedin.com")))
        .unwrap_or(false)
}

fn welcome_message(profile: &UserProfile) -> String {
    let greeting = match &profile.name {
        Some(name) => format!("Welcome, {name}!"),
        None => "Welcome!".to_string(),
    };
    format!(
        "{greeting} I'm your career coach. I can update your profile, analyze how well you fit a job, suggest career paths, or polish your profile content. What would you like to work on?"
    )
}

async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Json<Value> {
    let mut profile = payload.profile.unwrap_or_default();

    if let Some(url) = payload.linkedin_url {
        if !valid_linkedin_url(&url) {
            return Json(json!({"error": "Invalid LinkedIn URL"}));
        }
        profile.linkedin_url = Some(url);
    }

    match state.store.create_session(profile.clone()).await {
        Ok(session_id) => Json(json!({
            "session_id": session_id,
            "message": welcome_message(&profile),
        })),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            Json(json!({"error": "Failed to create session"}))
        }
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    session_id: String,
    message: String,
    #[serde(default)]
    resume_from_interrupt: bool,
}

async fn chat(State(state): State<AppState>, Json(payload): Json<ChatRequest>) -> Json<Value> {
    if payload.message.trim().is_empty() {
        return Json(json!({"error": "Message must not be empty"}));
    }

    match state.store.get_profile(&payload.session_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Json(json!({"error": SESSION_NOT_FOUND})),
        Err(e) => {
            log::error!("Session lookup failed: {}", e);
            return Json(json!({"error": SESSION_NOT_FOUND}));
        }
    }

    let outcome = state
        .orchestrator
        .process_turn(
            &payload.session_id,
            &payload.message,
            None,
            payload.resume_from_interrupt,
        )
        .await;

    match serde_json::to_value(&outcome) {
        Ok(value) => Json(value),
        Err(e) => {
            log::error!("Failed to serialize outcome: {}", e);
            Json(json!({"error": "Internal error"}))
        }
    }
}

async fn get_profile(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<Value> {
    match state.store.get_profile(&session_id).await {
        Ok(Some(profile)) => match serde_json::to_value(&profile) {
            Ok(value) => Json(value),
            Err(e) => {
                log::error!("Failed to serialize profile: {}", e);
                Json(json!({"error": "Internal error"}))
            }
        },
        Ok(None) => Json(json!({"error": SESSION_NOT_FOUND})),
        Err(e) => {
            log::error!("Profile lookup failed: {}", e);
            Json(json!({"error": SESSION_NOT_FOUND}))
        }
    }
}

async fn get_chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<Value> {
    match state.store.get_history(&session_id, 50).await {
        Ok(history) => Json(json!({ "history": history })),
        Err(e) => {
            log::error!("History lookup failed: {}", e);
            Json(json!({"error": SESSION_NOT_FOUND}))
        }
    }
}
