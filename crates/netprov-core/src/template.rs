// ── Template manager ──
//
// Projects and CLI templates on the intent controller. Publishing always
// replaces: any template with the same name is deleted (and the deletion
// awaited) before the new one is created and committed, so a project
// holds exactly one current version per template name.

use netprov_api::IntentClient;
use netprov_api::intent::models::{
    DeviceType, TemplateCreate, TemplateInfo, TemplateParam, VersionInfo,
};
use tracing::{debug, info};

use crate::config::TemplateSettings;
use crate::error::CoreError;
use crate::poll::{Attempt, PollPolicy, poll_until};
use crate::task::TaskWatcher;

const PRODUCT_FAMILY: &str = "Switches and Hubs";
const SOFTWARE_TYPE: &str = "IOS-XE";
const SOFTWARE_VARIANT: &str = "XE";

/// Project and template lifecycle on the intent controller.
pub struct TemplateManager<'a> {
    client: &'a IntentClient,
    settings: &'a TemplateSettings,
    policy: PollPolicy,
}

impl<'a> TemplateManager<'a> {
    pub fn new(client: &'a IntentClient, settings: &'a TemplateSettings, policy: PollPolicy) -> Self {
        Self {
            client,
            settings,
            policy,
        }
    }

    fn tasks(&self) -> TaskWatcher<'a> {
        TaskWatcher::new(self.client, self.policy)
    }

    // ── Projects ─────────────────────────────────────────────────────

    /// Id of project `name`, if it exists.
    pub async fn find_project(&self, name: &str) -> Result<Option<String>, CoreError> {
        let project = self
            .client
            .get_project_by_name(name)
            .await
            .map_err(CoreError::wrap(CoreError::project, "looking up project"))?;
        Ok(project.map(|p| p.id))
    }

    /// Return the id of project `name`, creating it if absent.
    pub async fn ensure_project(&self, name: &str) -> Result<String, CoreError> {
        let lookup = CoreError::wrap(CoreError::project, "looking up project");
        if let Some(project) = self.client.get_project_by_name(name).await.map_err(lookup)? {
            debug!(name, id = %project.id, "project exists");
            return Ok(project.id);
        }

        info!(name, "creating project");
        let task_ref = self
            .client
            .create_project(name)
            .await
            .map_err(CoreError::wrap(CoreError::project, "creating project"))?;
        let task = self.tasks().wait(&task_ref.task_id).await?;
        if task.is_error == Some(true) {
            return Err(CoreError::Project {
                message: format!(
                    "creating project `{name}` failed: {}",
                    task.failure_reason.as_deref().unwrap_or("no reason given")
                ),
            });
        }

        if let Some(id) = task.data_str() {
            return Ok(id.to_owned());
        }
        // Older controllers leave `data` empty; fall back to a lookup.
        self.client
            .get_project_by_name(name)
            .await
            .map_err(CoreError::wrap(CoreError::project, "looking up project"))?
            .map(|p| p.id)
            .ok_or_else(|| CoreError::Project {
                message: format!("project `{name}` was created but is not listed"),
            })
    }

    // ── Templates ────────────────────────────────────────────────────

    /// Id of the template `name` in the project, committed or not.
    pub async fn find_template(
        &self,
        name: &str,
        project_id: &str,
    ) -> Result<Option<String>, CoreError> {
        let templates = self
            .client
            .list_templates(project_id, true)
            .await
            .map_err(CoreError::wrap(CoreError::template, "listing templates"))?;
        Ok(templates
            .into_iter()
            .find(|t| t.name == name)
            .and_then(|t| t.template_id))
    }

    /// Replace template `name` with `content`, commit it, and return the
    /// new version id.
    pub async fn publish_template(
        &self,
        name: &str,
        project_id: &str,
        content: &str,
    ) -> Result<String, CoreError> {
        if let Some(stale) = self.find_template(name, project_id).await? {
            self.delete_template(name, project_id, &stale).await?;
        }

        info!(name, project_id, "creating template");
        let payload = template_payload(self.settings, name, project_id, content);
        let task_ref = self
            .client
            .create_template(project_id, &payload)
            .await
            .map_err(CoreError::wrap(CoreError::template, "creating template"))?;
        let task = self.tasks().wait(&task_ref.task_id).await?;
        if task.is_error == Some(true) {
            return Err(CoreError::Template {
                message: format!(
                    "creating template `{name}` failed: {}",
                    task.failure_reason.as_deref().unwrap_or("no reason given")
                ),
            });
        }
        let template_id = match task.data_str() {
            Some(id) => id.to_owned(),
            None => self.await_template(name, project_id).await?,
        };

        info!(name, %template_id, "committing template");
        let task_ref = self
            .client
            .commit_template(&template_id, &self.settings.commit_comment)
            .await
            .map_err(CoreError::wrap(CoreError::template, "committing template"))?;
        let task = self.tasks().wait(&task_ref.task_id).await?;
        if task.is_error == Some(true) {
            return Err(CoreError::Template {
                message: format!(
                    "committing template `{name}` failed: {}",
                    task.failure_reason.as_deref().unwrap_or("no reason given")
                ),
            });
        }

        let operation = format!("committed version of template {name}");
        let template_id = template_id.as_str();
        poll_until(&self.policy, &operation, || async move {
            Ok(match self.committed_version(name, project_id, Some(template_id)).await? {
                Some(version) => Attempt::Ready(version),
                None => Attempt::Pending,
            })
        })
        .await
    }

    /// Id of the newest committed version of template `name`.
    pub async fn latest_version(&self, name: &str, project_id: &str) -> Result<String, CoreError> {
        self.committed_version(name, project_id, None)
            .await?
            .ok_or_else(|| CoreError::Template {
                message: format!("template `{name}` has no committed version"),
            })
    }

    /// Newest committed version of `name`, restricted to `template_id`
    /// when given. A listing can still carry a just-deleted template.
    async fn committed_version(
        &self,
        name: &str,
        project_id: &str,
        template_id: Option<&str>,
    ) -> Result<Option<String>, CoreError> {
        let templates: Vec<TemplateInfo> = self
            .client
            .list_templates(project_id, false)
            .await
            .map_err(CoreError::wrap(CoreError::template, "listing template versions"))?;
        Ok(templates
            .iter()
            .filter(|t| t.name == name)
            .filter(|t| template_id.is_none_or(|id| t.template_id.as_deref() == Some(id)))
            .find_map(|t| select_latest_version(&t.versions_info))
            .map(|v| v.id.clone()))
    }

    async fn delete_template(
        &self,
        name: &str,
        project_id: &str,
        template_id: &str,
    ) -> Result<(), CoreError> {
        info!(name, template_id, "deleting stale template");
        self.client
            .delete_template(template_id)
            .await
            .map_err(CoreError::wrap(CoreError::template, "deleting template"))?;

        // No task id comes back; wait until the listing drops the name.
        let operation = format!("deletion of template {name}");
        poll_until(&self.policy, &operation, || async move {
            Ok(match self.find_template(name, project_id).await? {
                Some(_) => Attempt::Pending,
                None => Attempt::Ready(()),
            })
        })
        .await
    }

    async fn await_template(&self, name: &str, project_id: &str) -> Result<String, CoreError> {
        let operation = format!("creation of template {name}");
        poll_until(&self.policy, &operation, || async move {
            Ok(match self.find_template(name, project_id).await? {
                Some(id) => Attempt::Ready(id),
                None => Attempt::Pending,
            })
        })
        .await
    }
}

/// Highest numeric `version`; ties go to the last entry. Entries whose
/// version is missing or not a number are skipped.
pub fn select_latest_version(versions: &[VersionInfo]) -> Option<&VersionInfo> {
    let mut best: Option<(u64, &VersionInfo)> = None;
    for info in versions {
        let Some(number) = info.number() else {
            continue;
        };
        if best.is_none_or(|(top, _)| number >= top) {
            best = Some((number, info));
        }
    }
    best.map(|(_, info)| info)
}

/// Creation payload: fixed device family and parameter schema
/// (`vlanId` integer, `switchport` string, both required).
pub fn template_payload(
    settings: &TemplateSettings,
    name: &str,
    project_id: &str,
    content: &str,
) -> TemplateCreate {
    TemplateCreate {
        name: name.to_owned(),
        description: settings.description.clone(),
        tags: Vec::new(),
        author: settings.author.clone(),
        device_types: vec![DeviceType {
            product_family: PRODUCT_FAMILY.into(),
        }],
        software_type: SOFTWARE_TYPE.into(),
        software_variant: SOFTWARE_VARIANT.into(),
        template_content: content.to_owned(),
        rollback_template_content: String::new(),
        template_params: vec![
            TemplateParam {
                parameter_name: "vlanId".into(),
                data_type: "INTEGER".into(),
                description: "VLAN Number".into(),
                required: true,
            },
            TemplateParam {
                parameter_name: "switchport".into(),
                data_type: "STRING".into(),
                description: "Switchport (example GigabitEthernet1/0/6)".into(),
                required: true,
            },
        ],
        rollback_template_params: Vec::new(),
        parent_template_id: project_id.to_owned(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
