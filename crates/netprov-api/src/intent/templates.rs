// Template-programmer template endpoints
//
// Create, commit, delete, and list templates within a project.

use serde_json::Value;
use tracing::debug;

use super::TEMPLATE_PROGRAMMER;
use super::client::IntentClient;
use super::models::{CommitRequest, Envelope, TaskRef, TemplateCreate, TemplateInfo};
use crate::error::Error;

impl IntentClient {
    /// List the templates of a project with their committed versions.
    ///
    /// `GET .../template-programmer/template?projectId={id}&includeHead={bool}`.
    /// With `include_head = false` only committed templates are listed;
    /// with `true` uncommitted ones show up as well.
    pub async fn list_templates(
        &self,
        project_id: &str,
        include_head: bool,
    ) -> Result<Vec<TemplateInfo>, Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["template"])?;
        debug!(project_id, include_head, "listing templates");
        let include_head = if include_head { "true" } else { "false" };
        self.get(
            url,
            &[("projectId", project_id), ("includeHead", include_head)],
        )
        .await
    }

    /// Create a template under a project.
    ///
    /// `POST .../template-programmer/project/{projectId}/template`
    pub async fn create_template(
        &self,
        project_id: &str,
        template: &TemplateCreate,
    ) -> Result<TaskRef, Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["project", project_id, "template"])?;
        debug!(project_id, name = %template.name, "creating template");
        let envelope: Envelope<TaskRef> = self.post(url, template).await?;
        Ok(envelope.response)
    }

    /// Commit the current head of a template, producing a new version.
    ///
    /// `POST .../template-programmer/template/version`
    pub async fn commit_template(
        &self,
        template_id: &str,
        comments: &str,
    ) -> Result<TaskRef, Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["template", "version"])?;
        debug!(template_id, "committing template");
        let envelope: Envelope<TaskRef> = self
            .post(
                url,
                &CommitRequest {
                    template_id,
                    comments,
                },
            )
            .await?;
        Ok(envelope.response)
    }

    /// Delete a template and all of its versions.
    ///
    /// `DELETE .../template-programmer/template/{templateId}`
    pub async fn delete_template(&self, template_id: &str) -> Result<(), Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["template", template_id])?;
        debug!(template_id, "deleting template");
        let _: Value = self.delete(url).await?;
        Ok(())
    }
}
