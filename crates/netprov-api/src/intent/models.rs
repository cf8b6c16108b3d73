// Intent controller request and response types
//
// Most mutating endpoints answer with `{"response": {"taskId": ...}}`; list
// endpoints are either bare arrays or wrapped in the same `response` key.
// Fields use `#[serde(default)]` liberally because the controller omits
// empty values across releases.

use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// `{"response": T}` wrapper used by task, inventory, and sync endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
}

/// Body of the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
}

/// Handle to an asynchronous controller operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: String,
    #[serde(default)]
    pub url: Option<String>,
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Task status from `GET /dna/intent/api/v1/task/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_error: Option<bool>,
    #[serde(default)]
    pub progress: Option<String>,
    /// Operation result; a new project's or template's id on creation.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub end_time: Option<serde_json::Value>,
}

impl Task {
    /// A task is done once it has an end time or has flagged an error.
    pub fn is_complete(&self) -> bool {
        self.end_time.is_some() || self.is_error == Some(true)
    }

    /// `data` as a string, when the controller returned one.
    pub fn data_str(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

// ── Projects ─────────────────────────────────────────────────────────

/// A template-programmer project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectCreate<'a> {
    pub name: &'a str,
}

// ── Templates ────────────────────────────────────────────────────────

/// Payload for `POST .../project/{projectId}/template`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCreate {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub device_types: Vec<DeviceType>,
    pub software_type: String,
    pub software_variant: String,
    pub template_content: String,
    pub rollback_template_content: String,
    pub template_params: Vec<TemplateParam>,
    pub rollback_template_params: Vec<TemplateParam>,
    pub parent_template_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    pub product_family: String,
}

/// One typed template parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParam {
    pub parameter_name: String,
    pub data_type: String,
    pub description: String,
    pub required: bool,
}

/// Template entry from `GET .../template?projectId=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub name: String,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub versions_info: Vec<VersionInfo>,
}

/// One committed version of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub id: String,
    /// The controller sends this as a string; some releases send a number.
    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

impl VersionInfo {
    /// Numeric version, or `None` if absent or unparseable.
    pub fn number(&self) -> Option<u64> {
        match self.version.as_ref()? {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommitRequest<'a> {
    pub template_id: &'a str,
    pub comments: &'a str,
}

// ── Deployment ───────────────────────────────────────────────────────

/// Payload for `POST .../template/deploy`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub template_id: String,
    pub target_info: Vec<TargetInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Answer to a deploy request. `deployment_id` is a sentence whose last
/// word is the actual id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `GET .../template/deploy/status/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatusResponse {
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub devices: Vec<serde_json::Value>,
}

// ── Inventory ────────────────────────────────────────────────────────

/// Network device from the inventory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    pub id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub management_ip_address: Option<String>,
    #[serde(default)]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub reachability_status: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}
