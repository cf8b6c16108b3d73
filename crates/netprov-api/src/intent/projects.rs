// Template-programmer project endpoints

use tracing::debug;

use super::TEMPLATE_PROGRAMMER;
use super::client::IntentClient;
use super::models::{Envelope, Project, ProjectCreate, TaskRef};
use crate::error::Error;

impl IntentClient {
    /// Look up a project by exact name.
    ///
    /// `GET .../template-programmer/project?name={name}`. The controller
    /// answers with an array, empty when nothing matches.
    pub async fn get_project_by_name(&self, name: &str) -> Result<Option<Project>, Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["project"])?;
        debug!(name, "looking up project");
        let projects: Vec<Project> = self.get(url, &[("name", name)]).await?;
        Ok(projects.into_iter().find(|p| p.name == name))
    }

    /// Create a project. The returned task's `data` is the new project id.
    ///
    /// `POST .../template-programmer/project`
    pub async fn create_project(&self, name: &str) -> Result<TaskRef, Error> {
        let url = self.url(TEMPLATE_PROGRAMMER, &["project"])?;
        debug!(name, "creating project");
        let envelope: Envelope<TaskRef> = self.post(url, &ProjectCreate { name }).await?;
        Ok(envelope.response)
    }
}
