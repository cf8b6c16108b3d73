// ── Intent controller login ──

use netprov_api::{IntentClient, TransportConfig};
use secrecy::SecretString;
use tracing::info;

use crate::config::{ControllerEndpoint, ProvisionConfig};
use crate::error::CoreError;

/// Exchanges basic credentials for a session token.
///
/// No retry: a rejected login aborts the run.
pub struct Authenticator {
    endpoint: ControllerEndpoint,
    transport: TransportConfig,
}

impl Authenticator {
    pub fn new(endpoint: ControllerEndpoint, transport: TransportConfig) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn from_config(config: &ProvisionConfig) -> Self {
        Self::new(config.intent.clone(), config.transport())
    }

    /// Log in and return a client that carries the session token.
    pub async fn connect(&self) -> Result<IntentClient, CoreError> {
        let mut client = IntentClient::new(self.endpoint.url.clone(), &self.transport)?;
        self.login(&mut client).await?;
        Ok(client)
    }

    /// Log in on an existing client; returns the token.
    pub async fn login(&self, client: &mut IntentClient) -> Result<SecretString, CoreError> {
        let token = client
            .authenticate(&self.endpoint.username, &self.endpoint.password)
            .await
            .map_err(|e| match CoreError::from(e) {
                err @ (CoreError::ConnectionFailed { .. } | CoreError::Auth { .. }) => err,
                other => CoreError::Auth {
                    message: other.to_string(),
                },
            })?;
        info!(url = %self.endpoint.url, user = %self.endpoint.username, "authenticated");
        Ok(token)
    }
}
