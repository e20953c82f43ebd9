pub mod error;
pub mod events;
pub mod runner;
pub mod tasks;
pub mod webhook;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use webhook::WebhookClient;

#[derive(Clone)]
pub struct AppState {
    pub webhook: WebhookClient,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            webhook: WebhookClient::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the application router. Exposed so tests can drive it directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/tasks/long-running",
            post(tasks::start_long_running_task).fallback(tasks::method_not_allowed),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
