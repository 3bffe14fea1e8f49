//! Project creation, listing, and instruction-printing routes.

use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub project_path: PathBuf,
    pub project_name: String,
    /// filename → content. The map type preserves submission order, which
    /// the archive records.
    pub files: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct CreateProjectResponse {
    pub success: bool,
    pub message: String,
    pub project_path: String,
    pub project_name: String,
    pub file_count: usize,
}

/// Error type for malformed creation requests.
pub enum CreateProjectError {
    InvalidName(String),
    InvalidFileName(String),
    InvalidContent(String),
}

impl IntoResponse for CreateProjectError {
    fn into_response(self) -> Response {
        let message = match self {
            CreateProjectError::InvalidName(reason) => {
                format!("Invalid project name: {}", reason)
            }
            CreateProjectError::InvalidFileName(name) => {
                format!("Invalid file name: {:?}", name)
            }
            CreateProjectError::InvalidContent(name) => {
                format!("File content must be a string: {:?}", name)
            }
        };
        (StatusCode::BAD_REQUEST, message).into_response()
    }
}

/// Create a new project from a set of files and register it in the archive.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<CreateProjectResponse>, CreateProjectError> {
    let name = req.project_name.trim();
    if name.is_empty() {
        return Err(CreateProjectError::InvalidName(
            "name cannot be empty".to_string(),
        ));
    }

    // Validate the whole batch before touching the filesystem.
    let mut files: Vec<(String, &str)> = Vec::with_capacity(req.files.len());
    for (filename, content) in &req.files {
        if !is_safe_relative_path(filename) {
            return Err(CreateProjectError::InvalidFileName(filename.clone()));
        }
        let content = content
            .as_str()
            .ok_or_else(|| CreateProjectError::InvalidContent(filename.clone()))?;
        files.push((filename.clone(), content));
    }

    let path_str = req.project_path.to_string_lossy().to_string();
    match write_files(&req.project_path, &files, req.description.as_deref()) {
        Ok(()) => {}
        Err(e) => {
            warn!(target: "portico::api", "Error creating project {name}: {e}");
            return Ok(Json(CreateProjectResponse {
                success: false,
                message: format!("Error creating project: {}", e),
                project_path: path_str,
                project_name: name.to_string(),
                file_count: 0,
            }));
        }
    }

    let filenames: Vec<String> = files.into_iter().map(|(name, _)| name).collect();
    let logged = state.archive.log_registration(
        &path_str,
        name,
        &filenames,
        req.description.as_deref(),
    );
    if logged {
        state.refresh_recent_cache();
    }

    info!(
        target: "portico::api",
        "Created project {} with {} files at {}",
        name,
        filenames.len(),
        path_str
    );

    Ok(Json(CreateProjectResponse {
        success: logged,
        message: if logged {
            format!("Project '{}' created with {} files", name, filenames.len())
        } else {
            "Files written but project history could not be updated".to_string()
        },
        project_path: path_str,
        project_name: name.to_string(),
        file_count: filenames.len(),
    }))
}

fn write_files(
    project_path: &Path,
    files: &[(String, &str)],
    description: Option<&str>,
) -> std::io::Result<()> {
    std::fs::create_dir_all(project_path)?;

    for (filename, content) in files {
        let file_path = project_path.join(filename);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
    }

    if let Some(description) = description {
        std::fs::write(project_path.join("[description]"), description)?;
    }

    Ok(())
}

/// A file name must stay inside the project directory: relative, no parent
/// traversal, non-empty.
fn is_safe_relative_path(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let path = Path::new(name);
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[derive(Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct RecentProjectsResponse {
    pub projects: Vec<portico_types::RecentProject>,
}

/// Recent projects, served from the HTTP-layer cache. A limit beyond the
/// cached window falls through to a direct archive query.
pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Json<RecentProjectsResponse> {
    let limit = query.limit.unwrap_or(state.config.recent_limit);
    let projects = if limit <= state.config.recent_limit {
        state
            .recent_cache
            .read()
            .unwrap()
            .iter()
            .take(limit)
            .cloned()
            .collect()
    } else {
        state.archive.recent_projects(limit)
    };

    Json(RecentProjectsResponse { projects })
}

#[derive(Deserialize)]
pub struct PrintInstructionsRequest {
    pub project_path: PathBuf,
}

#[derive(Serialize)]
pub struct PrintInstructionsResponse {
    pub printed_path: String,
}

/// Copy a project's instructions file to a timestamped snapshot.
pub async fn print_instructions(
    Json(req): Json<PrintInstructionsRequest>,
) -> Result<Json<PrintInstructionsResponse>, (StatusCode, String)> {
    match portico_core::print_instructions(&req.project_path) {
        Some(path) => Ok(Json(PrintInstructionsResponse {
            printed_path: path.to_string_lossy().to_string(),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            "No instructions file found for this project".to_string(),
        )),
    }
}
