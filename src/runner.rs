use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::events::{StatusUpdate, TaskState};
use crate::webhook::WebhookClient;

/// One step of simulated work.
pub const STEP_SECS: u64 = 5;

/// Where progress notifications go, if the caller asked for any.
pub struct WebhookTarget {
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// A validated task request. Ephemeral: lives for one handler invocation.
pub struct TaskSpec {
    pub name: String,
    pub duration_minutes: f64,
    pub webhook: Option<WebhookTarget>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("step count is not representable for duration {0} minutes")]
    StepOverflow(f64),
}

/// Time-based prefix plus a random suffix. Unique enough per invocation;
/// global uniqueness is not needed since tasks are never looked up.
pub fn generate_task_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("task_{}_{}", Utc::now().timestamp_millis(), &uuid[..9])
}

/// Number of 5-second steps the duration divides into, floored at 1 so
/// progress computation never divides by zero.
pub fn total_steps(duration_minutes: f64) -> Result<u64, RunnerError> {
    let raw = (duration_minutes * 60.0 / STEP_SECS as f64).ceil();
    if !raw.is_finite() {
        return Err(RunnerError::StepOverflow(duration_minutes));
    }
    // Negative durations collapse to 0 here and get floored to a single step.
    Ok((raw as u64).max(1))
}

pub fn progress_for_step(step: u64, total: u64) -> u8 {
    ((step as f64 / total as f64) * 100.0).round() as u8
}

pub fn eta_for_step(step: u64, total: u64) -> String {
    format!("{}s", (total - step) * STEP_SECS)
}

/// Runs the simulated task to completion: one progress event per step (when a
/// webhook is configured), a pacing sleep between steps, and an unconditional
/// final COMPLETED event after the loop. Returns the generated task id.
///
/// The caller is not answered until this returns, so total wall-clock time is
/// roughly `duration_minutes` of simulated work.
pub async fn run_task(webhook: &WebhookClient, spec: &TaskSpec) -> Result<String, RunnerError> {
    let task_id = generate_task_id();
    let total = total_steps(spec.duration_minutes)?;

    tracing::info!(
        "Task {} ('{}'): {} steps of {}s",
        task_id,
        spec.name,
        total,
        STEP_SECS
    );

    for step in 1..=total {
        let progress = progress_for_step(step, total);

        if let Some(target) = &spec.webhook {
            let state = if step == total {
                TaskState::Completed
            } else {
                TaskState::Processing
            };
            let event = StatusUpdate::new(
                progress,
                eta_for_step(step, total),
                format!("Task '{}' is {}% complete.", spec.name, progress),
                state,
            );
            deliver(webhook, target, &event).await;
        }

        if step < total {
            sleep(Duration::from_secs(STEP_SECS)).await;
        }
    }

    // Final completion event, sent even when the last step already said 100%.
    if let Some(target) = &spec.webhook {
        let event = StatusUpdate::new(
            100,
            "0s".to_string(),
            format!("Task '{}' completed!", spec.name),
            TaskState::Completed,
        );
        deliver(webhook, target, &event).await;
    }

    tracing::info!("Task {} completed", task_id);
    Ok(task_id)
}

/// Delivery failures never abort the task loop.
async fn deliver(webhook: &WebhookClient, target: &WebhookTarget, event: &StatusUpdate) {
    if let Err(e) = webhook.send_update(&target.url, &target.headers, event).await {
        tracing::warn!("Failed to send webhook update: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_steps_for_whole_minutes() {
        assert_eq!(total_steps(1.0).unwrap(), 12);
        assert_eq!(total_steps(2.0).unwrap(), 24);
        assert_eq!(total_steps(10.0).unwrap(), 120);
    }

    #[test]
    fn test_total_steps_rounds_up() {
        // 20 seconds -> 4 steps, 21 seconds -> 5 steps
        assert_eq!(total_steps(20.0 / 60.0).unwrap(), 4);
        assert_eq!(total_steps(21.0 / 60.0).unwrap(), 5);
    }

    #[test]
    fn test_total_steps_floor_of_one() {
        // 5 seconds is exactly one step
        assert_eq!(total_steps(1.0 / 12.0).unwrap(), 1);
        // Sub-second durations still get one step
        assert_eq!(total_steps(0.0001).unwrap(), 1);
        // Negative durations collapse to one step rather than underflowing
        assert_eq!(total_steps(-3.0).unwrap(), 1);
    }

    #[test]
    fn test_total_steps_rejects_non_finite() {
        assert!(total_steps(1e308).is_err());
        assert!(total_steps(f64::INFINITY).is_err());
    }

    #[test]
    fn test_progress_monotonic_and_ends_at_100() {
        for total in 1..=50u64 {
            let mut last = 0u8;
            for step in 1..=total {
                let p = progress_for_step(step, total);
                assert!(p <= 100, "progress out of bounds: {}", p);
                assert!(p >= last, "progress regressed: {} -> {}", last, p);
                last = p;
            }
            assert_eq!(last, 100, "final progress must be 100 for total {}", total);
        }
    }

    #[test]
    fn test_progress_values_for_three_steps() {
        assert_eq!(progress_for_step(1, 3), 33);
        assert_eq!(progress_for_step(2, 3), 67);
        assert_eq!(progress_for_step(3, 3), 100);
    }

    #[test]
    fn test_eta_counts_down_to_zero() {
        assert_eq!(eta_for_step(1, 3), "10s");
        assert_eq!(eta_for_step(2, 3), "5s");
        assert_eq!(eta_for_step(3, 3), "0s");
    }

    #[test]
    fn test_task_id_format() {
        let id = generate_task_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "task");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_task_ids_differ_across_invocations() {
        assert_ne!(generate_task_id(), generate_task_id());
    }
}
