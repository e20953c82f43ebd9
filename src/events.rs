use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Lifecycle state reported in webhook events. There is no failure state:
/// simulated work cannot fail, and delivery failures are swallowed upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Processing,
    Completed,
}

/// Progress event POSTed to the caller's webhook. Transient, never stored.
#[derive(Clone, Debug, Serialize)]
pub struct StatusUpdate {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub metadata: ProgressMetadata,
    pub status: TaskStatus,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressMetadata {
    pub progress: u8,
    pub estimated_time_remaining: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct TaskStatus {
    pub message: StatusMessage,
    pub state: TaskState,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatusMessage {
    pub parts: Vec<MessagePart>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub part_type: &'static str,
    pub text: String,
}

impl StatusUpdate {
    /// Builds a `status-update` event with the timestamp taken at call time.
    pub fn new(progress: u8, eta: String, text: String, state: TaskState) -> Self {
        StatusUpdate {
            event_type: "status-update",
            metadata: ProgressMetadata {
                progress,
                estimated_time_remaining: eta,
            },
            status: TaskStatus {
                message: StatusMessage {
                    parts: vec![MessagePart {
                        part_type: "text",
                        text,
                    }],
                },
                state,
                // Millisecond precision, trailing Z
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}
