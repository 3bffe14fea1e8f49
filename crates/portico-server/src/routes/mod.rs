//! HTTP route handlers.

pub mod generate;
pub mod keys;
pub mod projects;
pub mod setup;

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: Vec<&'static str>,
    pub auto_shutdown: String,
}

/// Welcome page with basic info.
pub async fn home(State(state): State<Arc<AppState>>) -> Json<HomeResponse> {
    Json(HomeResponse {
        name: "Portico",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: vec![
            "/createProject - Create a new project from files",
            "/recentProjects - List recent projects",
            "/printInstructions - Print a project's instructions file",
            "/ai/generate - Generate text with a configured provider",
            "/ai/keys - Inspect or update provider API keys",
            "/setup - First-run setup status",
        ],
        auto_shutdown: format!(
            "Server shuts down after {} minutes of inactivity",
            state.config.idle_timeout_secs / 60
        ),
    })
}

/// Explicit activity ping from the dashboard; the tracking middleware does
/// the actual stamping.
pub async fn ping() -> StatusCode {
    StatusCode::NO_CONTENT
}
