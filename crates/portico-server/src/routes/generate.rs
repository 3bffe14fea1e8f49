//! Text generation route: forwards prompts to a configured AI provider.

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use portico_core::GenerateParams;
use portico_types::Generation;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

/// Generate text using the specified AI provider.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let params = GenerateParams {
        prompt: &req.prompt,
        provider: &req.provider,
        model: req.model.as_deref(),
        temperature: req.temperature,
        max_tokens: req.max_tokens,
    };

    match state.generator.generate(params).await {
        Ok(generation) => {
            write_generation_trace(&state.config.archive_dir, &req.prompt, &generation);
            Json(generation).into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Keep a JSON trace of each generation for later reference. Best-effort:
/// a failed trace never fails the request.
fn write_generation_trace(archive_dir: &Path, prompt: &str, generation: &Generation) {
    let dir = archive_dir.join("ai_logs");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        debug!(target: "portico::ai", "Skipping generation trace: {e}");
        return;
    }

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{}_{stamp}.json", generation.provider));
    let trace = json!({
        "prompt": prompt,
        "provider": generation.provider,
        "model": generation.model,
        "response": generation.text,
        "timestamp": stamp.to_string(),
    });

    match serde_json::to_vec_pretty(&trace) {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(&path, bytes) {
                debug!(target: "portico::ai", "Skipping generation trace: {e}");
            }
        }
        Err(e) => debug!(target: "portico::ai", "Skipping generation trace: {e}"),
    }
}
