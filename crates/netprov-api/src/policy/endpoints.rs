// Endpoint group and endpoint ERS resources

use tracing::debug;

use super::ERS_CONFIG;
use super::client::PolicyClient;
use super::models::{Endpoint, EndpointEnvelope, EndpointGroup, EndpointGroupEnvelope};
use crate::error::Error;

impl PolicyClient {
    /// Look up an endpoint group by exact name.
    ///
    /// `GET /ers/config/endpointgroup/name/{name}`
    pub async fn get_endpoint_group_by_name(
        &self,
        name: &str,
    ) -> Result<Option<EndpointGroup>, Error> {
        let url = self.url(ERS_CONFIG, &["endpointgroup", "name", name])?;
        debug!(name, "looking up endpoint group");
        let envelope: Option<EndpointGroupEnvelope> = self.get_optional(url).await?;
        Ok(envelope.map(|e| e.group))
    }

    /// Look up an endpoint by name (endpoints are named after their MAC).
    ///
    /// `GET /ers/config/endpoint/name/{name}`
    pub async fn get_endpoint_by_name(&self, name: &str) -> Result<Option<Endpoint>, Error> {
        let url = self.url(ERS_CONFIG, &["endpoint", "name", name])?;
        debug!(name, "looking up endpoint");
        let envelope: Option<EndpointEnvelope<Endpoint>> = self.get_optional(url).await?;
        Ok(envelope.map(|e| e.endpoint))
    }

    /// Create an endpoint record. Returns the HTTP status (201 on success).
    ///
    /// `POST /ers/config/endpoint`
    pub async fn create_endpoint(&self, endpoint: &Endpoint) -> Result<u16, Error> {
        let url = self.url(ERS_CONFIG, &["endpoint"])?;
        debug!(mac = %endpoint.mac, "creating endpoint");
        self.post_status(url, &EndpointEnvelope { endpoint }).await
    }

    /// Replace an existing endpoint record. Returns the HTTP status.
    ///
    /// `PUT /ers/config/endpoint/{id}`
    pub async fn update_endpoint(&self, id: &str, endpoint: &Endpoint) -> Result<u16, Error> {
        let url = self.url(ERS_CONFIG, &["endpoint", id])?;
        debug!(id, mac = %endpoint.mac, "updating endpoint");
        self.put_status(url, &EndpointEnvelope { endpoint }).await
    }
}
