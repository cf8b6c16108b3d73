// Template deployment endpoints

use tracing::debug;

use super::TEMPLATE_PROGRAMMER;
use super::client::IntentClient;
use super::models::{DeployRequest, DeployResponse, DeploymentStatusResponse};
use crate::error::Error;

impl IntentClient {
    /// Deploy a committed template version to one or more targets.
    ///
    /// `POST .../template-programmer/template/deploy`
    pub async fn deploy_template(&self, request: &DeployRequest) -> Result<DeployResponse, Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["template", "deploy"])?;
        debug!(template_id = %request.template_id, "deploying template");
        self.post(url, request).await
    }

    /// Fetch the status of a deployment.
    ///
    /// `GET .../template-programmer/template/deploy/status/{deploymentId}`
    pub async fn deployment_status(
        &self,
        deployment_id: &str,
    ) -> Result<DeploymentStatusResponse, Error> {
        let url = self.url(
            TEMPLATE_PROGRAMMER,
            &["template", "deploy", "status", deployment_id],
        )?;
        debug!(deployment_id, "fetching deployment status");
        self.get(url, &[]).await
    }
}
