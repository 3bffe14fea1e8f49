//! Integration tests for the project creation → history → recent-projects
//! pipeline.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use portico_server::{config::Config, router, state::AppState};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Create a full test app over a throwaway archive.
fn create_test_app() -> (Router, Arc<AppState>, TempDir) {
    let temp = TempDir::new().unwrap();
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        archive_dir: temp.path().join("archive"),
        idle_timeout_secs: 900,
        recent_limit: 3,
    };
    let state = Arc::new(AppState::new(config).expect("Failed to create AppState"));
    (router::build(state.clone()), state, temp)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
    (status, value)
}

fn create_request(project_path: &std::path::Path, name: &str, files: Value) -> Value {
    json!({
        "project_path": project_path.to_string_lossy(),
        "project_name": name,
        "files": files,
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _, _temp) = create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn home_lists_endpoints() {
    let (app, _, _temp) = create_test_app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Portico");
    assert!(body["endpoints"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn create_project_writes_files_and_registers_them() {
    let (app, _, temp) = create_test_app();
    let project_dir = temp.path().join("projects/demo");

    let mut request = create_request(
        &project_dir,
        "demo",
        json!({"b.py": "print('b')", "a.py": "print('a')"}),
    );
    request["description"] = json!("a demo project");

    let (status, body) = send(&app, "POST", "/createProject", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["file_count"], 2);
    assert_eq!(body["project_name"], "demo");

    assert_eq!(
        std::fs::read_to_string(project_dir.join("a.py")).unwrap(),
        "print('a')"
    );
    assert_eq!(
        std::fs::read_to_string(project_dir.join("[description]")).unwrap(),
        "a demo project"
    );

    let (status, body) = send(&app, "GET", "/recentProjects", None).await;
    assert_eq!(status, StatusCode::OK);
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "demo");
    assert_eq!(projects[0]["description"], "a demo project");
    // Files keep submission order, not alphabetical order.
    assert_eq!(
        projects[0]["files"],
        json!(["b.py [V1]", "a.py [V1]"])
    );
}

#[tokio::test]
async fn create_project_writes_nested_files() {
    let (app, _, temp) = create_test_app();
    let project_dir = temp.path().join("nested");

    let request = create_request(&project_dir, "nested", json!({"src/lib.rs": "pub fn f() {}"}));
    let (status, body) = send(&app, "POST", "/createProject", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(project_dir.join("src/lib.rs").exists());
}

#[tokio::test]
async fn create_project_rejects_traversal() {
    let (app, _, temp) = create_test_app();
    let request = create_request(
        &temp.path().join("p"),
        "p",
        json!({"../escape.py": "boom"}),
    );
    let (status, _) = send(&app, "POST", "/createProject", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!temp.path().join("escape.py").exists());
}

#[tokio::test]
async fn create_project_rejects_blank_name() {
    let (app, _, temp) = create_test_app();
    let request = create_request(&temp.path().join("p"), "   ", json!({"a.py": "x"}));
    let (status, _) = send(&app, "POST", "/createProject", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_project_rejects_non_string_content() {
    let (app, _, temp) = create_test_app();
    let request = create_request(&temp.path().join("p"), "p", json!({"a.py": 42}));
    let (status, _) = send(&app, "POST", "/createProject", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn versions_increment_across_requests() {
    let (app, _, temp) = create_test_app();
    let project_dir = temp.path().join("demo");

    for _ in 0..2 {
        let request = create_request(&project_dir, "demo", json!({"a.py": "print('a')"}));
        let (status, body) = send(&app, "POST", "/createProject", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let (_, body) = send(&app, "GET", "/recentProjects?limit=2", None).await;
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 2);
    // Newest batch first.
    assert_eq!(projects[0]["files"], json!(["a.py [V2]"]));
    assert_eq!(projects[1]["files"], json!(["a.py [V1]"]));
}

#[tokio::test]
async fn recent_projects_respects_limit_param() {
    let (app, _, temp) = create_test_app();
    for i in 0..4 {
        let name = format!("p{i}");
        let request = create_request(&temp.path().join(&name), &name, json!({"f.py": "x"}));
        send(&app, "POST", "/createProject", Some(request)).await;
    }

    let (_, body) = send(&app, "GET", "/recentProjects?limit=1", None).await;
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "p3");

    // Beyond the cached window the handler queries the archive directly.
    let (_, body) = send(&app, "GET", "/recentProjects?limit=10", None).await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn recent_projects_cache_survives_reads() {
    let (app, _, temp) = create_test_app();
    let request = create_request(&temp.path().join("demo"), "demo", json!({"a.py": "x"}));
    send(&app, "POST", "/createProject", Some(request)).await;

    let (_, first) = send(&app, "GET", "/recentProjects", None).await;
    let (_, second) = send(&app, "GET", "/recentProjects", None).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn print_instructions_round_trip() {
    let (app, _, temp) = create_test_app();
    let project_dir = temp.path().join("documented");
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(project_dir.join("INSTRUCTIONS.md"), "read me").unwrap();

    let request = json!({"project_path": project_dir.to_string_lossy()});
    let (status, body) = send(&app, "POST", "/printInstructions", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    let printed = body["printed_path"].as_str().unwrap();
    assert_eq!(std::fs::read_to_string(printed).unwrap(), "read me");
}

#[tokio::test]
async fn print_instructions_missing_file_is_404() {
    let (app, _, temp) = create_test_app();
    let project_dir = temp.path().join("bare");
    std::fs::create_dir_all(&project_dir).unwrap();

    let request = json!({"project_path": project_dir.to_string_lossy()});
    let (status, _) = send(&app, "POST", "/printInstructions", Some(request)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
