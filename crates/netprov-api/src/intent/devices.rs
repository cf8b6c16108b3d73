// Network device inventory and sync endpoints

use tracing::debug;

use super::INTENT_V1;
use super::client::IntentClient;
use super::models::{Envelope, NetworkDevice, TaskRef};
use crate::error::Error;

impl IntentClient {
    /// List inventory devices, optionally filtered by hostname.
    ///
    /// `GET /dna/intent/api/v1/network-device[?hostname={name}]`
    pub async fn list_devices(&self, hostname: Option<&str>) -> Result<Vec<NetworkDevice>, Error> {
        let url = self.url(INTENT_V1, &["network-device"])?;
        debug!(?hostname, "listing devices");
        let query: Vec<(&str, &str)> = hostname.map(|h| ("hostname", h)).into_iter().collect();
        let envelope: Envelope<Vec<NetworkDevice>> = self.get(url, &query).await?;
        Ok(envelope.response)
    }

    /// Ask the controller to re-read configuration from devices.
    ///
    /// `PUT /dna/intent/api/v1/network-device/sync?forceSync={bool}` with a
    /// JSON array of device ids. Returns the HTTP status (202 when the sync
    /// was accepted) together with the task handle.
    pub async fn sync_devices(
        &self,
        device_ids: &[String],
        force: bool,
    ) -> Result<(u16, TaskRef), Error> {
        let url = self.url(INTENT_V1, &["network-device", "sync"])?;
        debug!(?device_ids, force, "syncing devices");
        let force = if force { "true" } else { "false" };
        let (status, envelope): (u16, Envelope<TaskRef>) =
            self.put(url, &[("forceSync", force)], &device_ids).await?;
        Ok((status, envelope.response))
    }
}
