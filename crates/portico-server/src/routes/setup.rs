//! First-run setup status routes.
//!
//! Setup here is a status surface, not a hard gate: the dashboard shows it
//! until the marker is written, but project creation works regardless.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

const SETUP_MARKER: &str = ".setup_complete";

#[derive(Serialize)]
pub struct SetupStatus {
    /// The archive directory and history store exist.
    pub archive_initialized: bool,
    /// Number of providers with a configured API key.
    pub providers_configured: usize,
    /// The setup marker has been written.
    pub setup_complete: bool,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<SetupStatus> {
    let providers_configured = state
        .keys
        .list_status()
        .values()
        .filter(|status| status.configured)
        .count();

    Json(SetupStatus {
        archive_initialized: state.archive.history_path().exists(),
        providers_configured,
        setup_complete: state.config.archive_dir.join(SETUP_MARKER).exists(),
    })
}

#[derive(Serialize)]
pub struct SetupCompleteResponse {
    pub status: &'static str,
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SetupCompleteResponse>, (StatusCode, String)> {
    let marker = state.config.archive_dir.join(SETUP_MARKER);
    std::fs::write(&marker, b"")
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(target: "portico::startup", "Setup marked complete");
    Ok(Json(SetupCompleteResponse { status: "success" }))
}
