//! Router assembly, shared between main.rs and the integration tests.

use crate::{activity, routes, state::AppState};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the full HTTP surface over the given state.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        // Project management
        .route("/createProject", post(routes::projects::create))
        .route("/recentProjects", get(routes::projects::recent))
        .route("/printInstructions", post(routes::projects::print_instructions))
        // AI providers
        .route("/ai/keys", get(routes::keys::list).post(routes::keys::update))
        .route("/ai/generate", post(routes::generate::generate))
        // Setup and liveness
        .route("/setup", get(routes::setup::status).post(routes::setup::complete))
        .route("/activity", post(routes::ping))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            activity::track,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
