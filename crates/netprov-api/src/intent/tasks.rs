// Generic task status endpoint

use tracing::debug;

use super::INTENT_V1;
use super::client::IntentClient;
use super::models::{Envelope, Task};
use crate::error::Error;

impl IntentClient {
    /// Fetch the current state of an asynchronous task.
    ///
    /// `GET /dna/intent/api/v1/task/{taskId}`
    pub async fn get_task(&self, task_id: &str) -> Result<Task, Error> {
        let url = self.url(INTENT_V1, &["task", task_id])?;
        debug!(task_id, "fetching task");
        let envelope: Envelope<Task> = self.get(url, &[]).await?;
        Ok(envelope.response)
    }
}
