pub mod health;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::submission::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::form_page))
        .route("/health", get(health::health_handler))
        .route("/api/v1/job-descriptions", post(handlers::handle_generate))
        .route(
            "/api/v1/job-descriptions/download",
            post(handlers::handle_download),
        )
        .with_state(state)
}
