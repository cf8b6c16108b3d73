// ── Controller task tracking ──
//
// Mutating intent-controller calls hand back a task id. `TaskWatcher`
// polls `GET /task/{id}` under the run's `PollPolicy` until the task has
// an end time or flags an error.

use netprov_api::IntentClient;
use netprov_api::intent::models::Task;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::poll::{Attempt, PollPolicy, poll_until};

/// Final outcome of a controller task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskResult {
    Success,
    Failure,
}

impl TaskResult {
    /// Map a task's `isError` flag.
    pub fn from_is_error(is_error: bool) -> Self {
        if is_error { Self::Failure } else { Self::Success }
    }

    pub fn of(task: &Task) -> Self {
        Self::from_is_error(task.is_error == Some(true))
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Errors worth another attempt: the controller is briefly unavailable, has
/// not indexed the task yet (404), or answered with a partial body.
fn is_retryable(err: &netprov_api::Error) -> bool {
    err.is_transient()
        || err.is_not_found()
        || matches!(err, netprov_api::Error::Deserialization { .. })
}

/// Polls controller tasks to completion.
pub struct TaskWatcher<'a> {
    client: &'a IntentClient,
    policy: PollPolicy,
}

impl<'a> TaskWatcher<'a> {
    pub fn new(client: &'a IntentClient, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    /// Single fetch, no waiting.
    pub async fn fetch(&self, task_id: &str) -> Result<Task, CoreError> {
        Ok(self.client.get_task(task_id).await?)
    }

    /// Poll until the task is complete and return its final state.
    pub async fn wait(&self, task_id: &str) -> Result<Task, CoreError> {
        let client = self.client;
        let operation = format!("task {task_id}");
        poll_until(&self.policy, &operation, || async move {
            match client.get_task(task_id).await {
                Ok(task) if task.is_complete() => {
                    debug!(task_id, is_error = ?task.is_error, "task complete");
                    Ok(Attempt::Ready(task))
                }
                Ok(task) => {
                    trace!(task_id, progress = ?task.progress, "task still running");
                    Ok(Attempt::Pending)
                }
                Err(e) if is_retryable(&e) => Ok(Attempt::Transient(e.to_string())),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Wait for the task, then map `isError` to an outcome.
    pub async fn result(&self, task_id: &str) -> Result<TaskResult, CoreError> {
        let task = self.wait(task_id).await?;
        Ok(TaskResult::of(&task))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn is_error_maps_to_outcome() {
        assert_eq!(TaskResult::from_is_error(false), TaskResult::Success);
        assert_eq!(TaskResult::from_is_error(true), TaskResult::Failure);
    }

    #[test]
    fn outcome_wire_names() {
        assert_eq!(TaskResult::Success.to_string(), "SUCCESS");
        assert_eq!(TaskResult::from_str("FAILURE").unwrap(), TaskResult::Failure);
        assert_eq!(
            serde_json::to_value(TaskResult::Failure).unwrap(),
            serde_json::json!("FAILURE")
        );
    }

    #[test]
    fn missing_flag_is_success() {
        let task: Task = serde_json::from_value(serde_json::json!({"endTime": 1})).unwrap();
        assert_eq!(TaskResult::of(&task), TaskResult::Success);
    }
}
