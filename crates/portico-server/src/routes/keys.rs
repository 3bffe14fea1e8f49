//! Provider API key management routes.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use portico_types::KeyStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// List provider key status without exposing the keys themselves.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, KeyStatus>> {
    Json(state.keys.list_status())
}

#[derive(Deserialize)]
pub struct KeyUpdateRequest {
    pub provider: String,
    pub api_key: String,
    #[serde(default)]
    pub additional_info: Option<BTreeMap<String, String>>,
}

#[derive(Serialize)]
pub struct KeyUpdateResponse {
    pub status: &'static str,
    pub message: String,
}

/// Update the API key for a specific provider.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeyUpdateRequest>,
) -> Result<Json<KeyUpdateResponse>, (StatusCode, String)> {
    let extra = req
        .additional_info
        .unwrap_or_default()
        .into_iter()
        .map(|(field, value)| (field, serde_json::Value::String(value)))
        .collect();

    if state.keys.set(&req.provider, &req.api_key, extra) {
        info!(target: "portico::keys", "Updated API key for {}", req.provider);
        Ok(Json(KeyUpdateResponse {
            status: "success",
            message: format!("{} API key updated", req.provider),
        }))
    } else {
        Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update API key".to_string(),
        ))
    }
}
