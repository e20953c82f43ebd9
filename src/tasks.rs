use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::runner::{self, TaskSpec, WebhookTarget};
use crate::AppState;

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
pub struct LongRunningTaskRequest {
    pub task_name: Option<String>,
    pub duration_minutes: Option<f64>,
    #[serde(rename = "webhook_url__")]
    pub webhook_url: Option<String>,
    #[serde(rename = "webhook_headers__")]
    pub webhook_headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize)]
pub struct TaskStartedResponse {
    pub message: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
}

// === Handlers ===

/// Simulates a long-running task, pacing through 5-second steps and pushing
/// progress events to the caller's webhook. Does not answer until the whole
/// simulated duration has elapsed.
pub async fn start_long_running_task(
    State(state): State<AppState>,
    body: Option<Json<LongRunningTaskRequest>>,
) -> Result<Json<TaskStartedResponse>, ApiError> {
    // An absent or unparseable body has no usable fields either
    let Some(Json(req)) = body else {
        return Err(ApiError::Validation);
    };

    // Empty name and zero duration count as missing
    let name = req.task_name.filter(|n| !n.is_empty());
    let duration = req.duration_minutes.filter(|d| *d != 0.0);
    let (Some(name), Some(duration)) = (name, duration) else {
        return Err(ApiError::Validation);
    };

    let headers = req.webhook_headers.unwrap_or_default();
    let webhook = req
        .webhook_url
        .filter(|u| !u.is_empty())
        .map(|url| WebhookTarget { url, headers });

    let spec = TaskSpec {
        name: name.clone(),
        duration_minutes: duration,
        webhook,
    };

    let task_id = runner::run_task(&state.webhook, &spec).await.map_err(|e| {
        tracing::error!("Task runner failed: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(TaskStartedResponse {
        message: format!("Task '{}' started.", name),
        task_id,
    }))
}

/// Fallback for non-POST verbs on the task route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
