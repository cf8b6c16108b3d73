// ── Provisioning workflow ──
//
// Runs the five stages in order, threading each stage's output into the
// next. Any failure aborts the run; nothing is rolled back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::access::{AccessRegistrar, Registration};
use crate::auth::Authenticator;
use crate::config::ProvisionConfig;
use crate::deploy::{DeployParams, DeploymentDriver, DeploymentStatus};
use crate::descriptor::ProvisionDescriptor;
use crate::error::CoreError;
use crate::sync::DeviceSync;
use crate::task::TaskResult;
use crate::template::TemplateManager;

/// Workflow stage, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Step {
    Authenticate,
    Project,
    Template,
    Deploy,
    Sync,
    Register,
}

/// Receives one human-readable line per completed stage.
pub trait Progress: Send + Sync {
    fn started(&self, step: Step, message: &str);
    fn finished(&self, step: Step, message: &str);
}

/// Discards progress; the tracing log still records every stage.
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn started(&self, _step: Step, _message: &str) {}
    fn finished(&self, _step: Step, _message: &str) {}
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub project_id: String,
    pub template_version_id: String,
    pub deployment_id: String,
    pub deployment_status: DeploymentStatus,
    pub sync_status: u16,
    pub sync_task_id: String,
    pub sync_result: TaskResult,
    pub registration: Registration,
}

/// The end-to-end provisioning run.
pub struct Provisioner {
    config: ProvisionConfig,
}

impl Provisioner {
    pub fn new(config: ProvisionConfig) -> Self {
        Self { config }
    }

    /// Publish `template_text`, deploy it per `descriptor`, sync the
    /// switch, and register the client MAC.
    pub async fn run(
        &self,
        template_text: &str,
        descriptor: &ProvisionDescriptor,
        progress: &dyn Progress,
    ) -> Result<ProvisionReport, CoreError> {
        descriptor.validate()?;
        let started_at = Utc::now();
        let config = &self.config;
        // Fail on missing policy credentials before touching anything.
        let registrar = AccessRegistrar::connect(config)?;

        // ── Authenticate ─────────────────────────────────────────────
        progress.started(Step::Authenticate, &format!("Logging in to {}", config.intent.url));
        let client = Authenticator::from_config(config).connect().await?;
        progress.finished(Step::Authenticate, "Session token obtained");

        // ── Project + template ───────────────────────────────────────
        let templates = TemplateManager::new(&client, &config.template, config.poll);
        let project = &config.template.project;
        progress.started(Step::Project, &format!("Ensuring project {project}"));
        let project_id = templates.ensure_project(project).await?;
        progress.finished(Step::Project, &format!("Project {project} ready (id {project_id})"));

        let name = &config.template.name;
        progress.started(Step::Template, &format!("Publishing template {name}"));
        let version_id = templates
            .publish_template(name, &project_id, template_text)
            .await?;
        progress.finished(
            Step::Template,
            &format!("Template {name} committed (version {version_id})"),
        );

        // ── Deploy ───────────────────────────────────────────────────
        let switch = &descriptor.switch_name;
        let params = DeployParams {
            vlan: descriptor.vlan,
            switchport: descriptor.switchport.clone(),
        };
        progress.started(
            Step::Deploy,
            &format!(
                "Deploying VLAN {} on {switch} {}",
                params.vlan, params.switchport
            ),
        );
        let driver = DeploymentDriver::new(&client, config.poll);
        let deployment_id = driver.deploy(&version_id, switch, &params).await?;
        let deployment_status = driver.wait_for_completion(&deployment_id).await?;
        if deployment_status == DeploymentStatus::Failure {
            return Err(CoreError::Deployment {
                message: format!("deployment {deployment_id} to {switch} reported FAILURE"),
            });
        }
        progress.finished(
            Step::Deploy,
            &format!("Deployment {deployment_id}: {deployment_status}"),
        );

        // ── Sync ─────────────────────────────────────────────────────
        progress.started(Step::Sync, &format!("Syncing {switch}"));
        let syncer = DeviceSync::new(&client, config.poll);
        let (sync_status, sync_task_id) = syncer.sync(switch).await?;
        let sync_result = syncer.task_result(&sync_task_id).await?;
        if !sync_result.is_success() {
            return Err(CoreError::Sync {
                message: format!("sync task {sync_task_id} for {switch} reported FAILURE"),
            });
        }
        progress.finished(
            Step::Sync,
            &format!("Sync of {switch} (HTTP {sync_status}): {sync_result}"),
        );

        // ── Register ─────────────────────────────────────────────────
        let mac = &descriptor.mac_address;
        let group = &descriptor.endpoint_group;
        progress.started(Step::Register, &format!("Adding {mac} to {group}"));
        let registration = registrar.register(mac, group).await?;
        progress.finished(
            Step::Register,
            &format!(
                "{mac} in {group}: {} (HTTP {})",
                registration.outcome, registration.status
            ),
        );

        let report = ProvisionReport {
            started_at,
            finished_at: Utc::now(),
            project_id,
            template_version_id: version_id,
            deployment_id,
            deployment_status,
            sync_status,
            sync_task_id,
            sync_result,
            registration,
        };
        info!(
            deployment_id = %report.deployment_id,
            sync_task_id = %report.sync_task_id,
            "provisioning complete"
        );
        Ok(report)
    }
}
