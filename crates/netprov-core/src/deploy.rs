// ── Deployment driver ──
//
// Pushes a committed template version to one device and tracks the
// deployment until the controller reports a terminal status.

use std::fmt;

use netprov_api::IntentClient;
use netprov_api::intent::models::{DeployRequest, TargetInfo};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::poll::{Attempt, PollPolicy, poll_until};

/// Deploy targets are addressed by hostname.
const TARGET_TYPE: &str = "MANAGED_DEVICE_HOSTNAME";

/// Status of a template deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentStatus {
    Init,
    InProgress,
    Success,
    Failure,
    /// Anything else the controller reports, kept verbatim.
    Other(String),
}

impl DeploymentStatus {
    /// `SUCCESS` and `FAILURE` are final; everything else may still change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Init => "INIT",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for DeploymentStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "INIT" => Self::Init,
            "IN_PROGRESS" => Self::InProgress,
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeploymentStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Runtime values substituted into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
    pub vlan: u16,
    pub switchport: String,
}

impl DeployParams {
    /// `{"vlanId": <int>, "switchport": <string>}`
    pub fn to_map(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("vlanId".into(), Value::from(self.vlan));
        params.insert("switchport".into(), Value::from(self.switchport.clone()));
        params
    }
}

/// Extract the deployment id from the controller's status sentence.
///
/// The controller answers with prose such as
/// `"Deployment of Template: ... Deployment id: 554a9f"`; the id is the
/// last whitespace-separated token.
pub fn parse_deployment_id(raw: &str) -> Result<String, CoreError> {
    raw.split_whitespace()
        .last()
        .map(str::to_owned)
        .ok_or_else(|| CoreError::Deployment {
            message: "controller returned an empty deployment id".into(),
        })
}

/// Deploys templates and tracks deployments.
pub struct DeploymentDriver<'a> {
    client: &'a IntentClient,
    policy: PollPolicy,
}

impl<'a> DeploymentDriver<'a> {
    pub fn new(client: &'a IntentClient, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    /// Deploy `version_id` to `device_name`; returns the deployment id.
    pub async fn deploy(
        &self,
        version_id: &str,
        device_name: &str,
        params: &DeployParams,
    ) -> Result<String, CoreError> {
        let request = DeployRequest {
            template_id: version_id.to_owned(),
            target_info: vec![TargetInfo {
                id: device_name.to_owned(),
                target_type: TARGET_TYPE.into(),
                params: params.to_map(),
            }],
        };

        let response = self
            .client
            .deploy_template(&request)
            .await
            .map_err(CoreError::wrap(CoreError::deployment, "deploying template"))?;
        let raw = response.deployment_id.ok_or_else(|| CoreError::Deployment {
            message: format!(
                "deploy response has no deploymentId (status: {})",
                response.status.as_deref().unwrap_or("none")
            ),
        })?;

        let id = parse_deployment_id(&raw)?;
        info!(version_id, device_name, deployment_id = %id, "deployment submitted");
        Ok(id)
    }

    /// One status fetch, no waiting.
    pub async fn poll_status(&self, deployment_id: &str) -> Result<DeploymentStatus, CoreError> {
        let response = self
            .client
            .deployment_status(deployment_id)
            .await
            .map_err(CoreError::wrap(CoreError::deployment, "fetching deployment status"))?;
        let status = response
            .status
            .as_deref()
            .map_or_else(|| DeploymentStatus::Other(String::new()), DeploymentStatus::from);
        debug!(deployment_id, %status, "deployment status");
        Ok(status)
    }

    /// Poll until the deployment reaches `SUCCESS` or `FAILURE`.
    ///
    /// `FAILURE` is returned, not raised.
    pub async fn wait_for_completion(
        &self,
        deployment_id: &str,
    ) -> Result<DeploymentStatus, CoreError> {
        let operation = format!("deployment {deployment_id}");
        poll_until(&self.policy, &operation, || async move {
            match self.poll_status(deployment_id).await {
                Ok(status) if status.is_terminal() => Ok(Attempt::Ready(status)),
                Ok(_) => Ok(Attempt::Pending),
                Err(CoreError::Api { status, body, .. }) if status == 404 || status >= 500 => {
                    Ok(Attempt::Transient(format!("HTTP {status}: {body}")))
                }
                Err(e @ CoreError::ConnectionFailed { .. }) => Ok(Attempt::Transient(e.to_string())),
                Err(e) => Err(e),
            }
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deployment_id_is_last_token() {
        let id = parse_deployment_id("Deployment of  Template: v-2.ApproxEndTime: 1. Deployment id 554a9f")
            .unwrap();
        assert_eq!(id, "554a9f");
    }

    #[test]
    fn single_token_is_the_id() {
        assert_eq!(parse_deployment_id("554a9f").unwrap(), "554a9f");
        assert_eq!(parse_deployment_id("id 554a9f \n").unwrap(), "554a9f");
    }

    #[test]
    fn empty_deployment_id_is_error() {
        assert!(matches!(
            parse_deployment_id("   "),
            Err(CoreError::Deployment { .. })
        ));
        assert!(parse_deployment_id("").is_err());
    }

    #[test]
    fn status_parsing() {
        assert_eq!(DeploymentStatus::from("SUCCESS"), DeploymentStatus::Success);
        assert_eq!(DeploymentStatus::from("failure"), DeploymentStatus::Failure);
        assert_eq!(DeploymentStatus::from("IN_PROGRESS"), DeploymentStatus::InProgress);
        assert_eq!(
            DeploymentStatus::from("QUEUED"),
            DeploymentStatus::Other("QUEUED".into())
        );
        assert!(DeploymentStatus::Failure.is_terminal());
        assert!(!DeploymentStatus::Init.is_terminal());
        assert_eq!(DeploymentStatus::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn params_map() {
        let params = DeployParams {
            vlan: 10,
            switchport: "Gi1/0/6".into(),
        };
        assert_eq!(
            Value::Object(params.to_map()),
            serde_json::json!({"vlanId": 10, "switchport": "Gi1/0/6"})
        );
    }
}
