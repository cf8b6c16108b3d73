// ── Device sync trigger ──
//
// Resolves a switch by hostname and forces the intent controller to
// re-read its running configuration.

use netprov_api::IntentClient;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::poll::PollPolicy;
use crate::task::{TaskResult, TaskWatcher};

/// Inventory facts about one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub id: String,
    pub hostname: String,
    pub management_ip: Option<String>,
    pub platform: Option<String>,
    pub software_version: Option<String>,
    pub reachability: Option<String>,
}

/// Inventory lookups and forced config sync.
pub struct DeviceSync<'a> {
    client: &'a IntentClient,
    policy: PollPolicy,
}

impl<'a> DeviceSync<'a> {
    pub fn new(client: &'a IntentClient, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    /// Find a device by exact hostname.
    ///
    /// The inventory query carries a `hostname` filter, but the match is
    /// always re-checked here: controllers that ignore the filter return
    /// the full inventory.
    pub async fn resolve_device(&self, device_name: &str) -> Result<DeviceInfo, CoreError> {
        let devices = self
            .client
            .list_devices(Some(device_name))
            .await
            .map_err(CoreError::wrap(CoreError::sync, "listing devices"))?;
        debug!(device_name, candidates = devices.len(), "inventory scanned");

        devices
            .into_iter()
            .find(|d| d.hostname.as_deref() == Some(device_name))
            .map(|d| DeviceInfo {
                id: d.id,
                hostname: device_name.to_owned(),
                management_ip: d.management_ip_address,
                platform: d.platform_id,
                software_version: d.software_version,
                reachability: d.reachability_status,
            })
            .ok_or_else(|| CoreError::Lookup {
                kind: "Device",
                name: device_name.to_owned(),
            })
    }

    /// Force a config sync; returns the HTTP status and the task id.
    pub async fn sync(&self, device_name: &str) -> Result<(u16, String), CoreError> {
        let device = self.resolve_device(device_name).await?;
        let (status, task) = self
            .client
            .sync_devices(std::slice::from_ref(&device.id), true)
            .await
            .map_err(CoreError::wrap(CoreError::sync, "requesting device sync"))?;
        info!(device_name, device_id = %device.id, status, task_id = %task.task_id, "sync requested");
        Ok((status, task.task_id))
    }

    /// Wait for the sync task and report its outcome.
    pub async fn task_result(&self, task_id: &str) -> Result<TaskResult, CoreError> {
        TaskWatcher::new(self.client, self.policy).result(task_id).await
    }
}
