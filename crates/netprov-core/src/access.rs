// ── Access registrar ──
//
// Puts a client MAC into a named endpoint group on the policy controller.
// Registration is idempotent: an endpoint already in the group is left
// alone and one in a different group is moved rather than duplicated.

use netprov_api::PolicyClient;
use netprov_api::policy::models::Endpoint;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{EndpointSettings, ProvisionConfig};
use crate::descriptor::MacAddress;
use crate::error::CoreError;

/// What `register` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationOutcome {
    /// New endpoint record.
    Created,
    /// Existing record reassigned from another group.
    Moved,
    /// Already in the group; nothing written.
    AlreadyMember,
}

/// Result of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Raw HTTP status of the write (200 when nothing was written).
    pub status: u16,
    pub outcome: RegistrationOutcome,
    pub group_id: String,
}

/// Endpoint group membership on the policy controller.
pub struct AccessRegistrar {
    client: PolicyClient,
    settings: EndpointSettings,
}

impl AccessRegistrar {
    pub fn new(client: PolicyClient, settings: EndpointSettings) -> Self {
        Self { client, settings }
    }

    /// Build a registrar from the run config. Fails if no policy
    /// controller is configured.
    pub fn connect(config: &ProvisionConfig) -> Result<Self, CoreError> {
        let policy = config.policy.as_ref().ok_or_else(|| CoreError::Config {
            message: "no policy controller configured".into(),
        })?;
        let client = PolicyClient::new(
            policy.url.clone(),
            policy.username.clone(),
            policy.password.clone(),
            &config.transport(),
        )?;
        Ok(Self::new(client, config.endpoint.clone()))
    }

    /// Id of the endpoint group `name`.
    pub async fn group_id(&self, name: &str) -> Result<String, CoreError> {
        let group = self
            .client
            .get_endpoint_group_by_name(name)
            .await?
            .ok_or_else(|| CoreError::Lookup {
                kind: "Endpoint group",
                name: name.to_owned(),
            })?;
        debug!(name, id = %group.id, "endpoint group resolved");
        Ok(group.id)
    }

    /// Make `mac` a member of `group_name`.
    pub async fn register(
        &self,
        mac: &MacAddress,
        group_name: &str,
    ) -> Result<Registration, CoreError> {
        let group_id = self.group_id(group_name).await?;
        let existing = self.client.get_endpoint_by_name(mac.as_str()).await?;

        let record = Endpoint {
            id: None,
            name: mac.to_string(),
            description: Some(self.settings.description.clone()),
            mac: mac.to_string(),
            profile_id: Some(self.settings.profile_id.clone()),
            static_profile_assignment: false,
            group_id: Some(group_id.clone()),
            static_group_assignment: true,
        };

        let (status, outcome) = match existing {
            Some(current) if current.group_id.as_deref() == Some(group_id.as_str()) => {
                (200, RegistrationOutcome::AlreadyMember)
            }
            Some(Endpoint { id: Some(id), .. }) => {
                let record = Endpoint {
                    id: Some(id.clone()),
                    ..record
                };
                let status = self.client.update_endpoint(&id, &record).await?;
                (status, RegistrationOutcome::Moved)
            }
            Some(Endpoint { id: None, .. }) => {
                return Err(CoreError::UnexpectedResponse {
                    endpoint: format!("ers/config/endpoint/name/{mac}"),
                    message: "endpoint record has no id to update".into(),
                });
            }
            None => {
                let status = self.client.create_endpoint(&record).await?;
                (status, RegistrationOutcome::Created)
            }
        };

        info!(%mac, group_name, %outcome, status, "endpoint registered");
        Ok(Registration {
            status,
            outcome,
            group_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(RegistrationOutcome::AlreadyMember.to_string(), "already-member");
        assert_eq!(RegistrationOutcome::Created.to_string(), "created");
    }
}
