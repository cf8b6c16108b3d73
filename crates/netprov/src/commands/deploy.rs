//! Deployment commands.

use serde::Serialize;

use netprov_core::{
    DeployParams, DeploymentDriver, DeploymentStatus, ProvisionConfig, TemplateManager,
};

use crate::cli::{DeployArgs, DeployCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{template, util};

#[derive(Serialize)]
struct DeploymentView {
    deployment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_id: Option<String>,
    /// `None` when submitted with `--no-wait`.
    status: Option<DeploymentStatus>,
}

pub async fn handle(
    config: &ProvisionConfig,
    args: DeployArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::intent_client(config).await?;
    let driver = DeploymentDriver::new(&client, config.poll);

    let view = match args.command {
        DeployCommand::Apply {
            device,
            vlan,
            switchport,
            no_wait,
            target,
        } => {
            let settings = util::template_settings(config, &target);
            let manager = TemplateManager::new(&client, &settings, config.poll);
            let project_id = template::existing_project(&manager, &settings).await?;
            let version_id = manager.latest_version(&settings.name, &project_id).await?;

            let params = DeployParams { vlan, switchport };
            let deployment_id = driver.deploy(&version_id, &device, &params).await?;
            let status = if no_wait {
                None
            } else {
                Some(driver.wait_for_completion(&deployment_id).await?)
            };
            if status == Some(DeploymentStatus::Failure) {
                return Err(CliError::Provisioning {
                    stage: "Deployment".into(),
                    message: format!("deployment {deployment_id} to {device} reported FAILURE"),
                });
            }
            DeploymentView {
                deployment_id,
                device: Some(device),
                version_id: Some(version_id),
                status,
            }
        }
        DeployCommand::Status { id } => {
            let status = driver.poll_status(&id).await?;
            DeploymentView {
                deployment_id: id,
                device: None,
                version_id: None,
                status: Some(status),
            }
        }
    };

    let color = util::color(global);
    let out = output::render_single(
        global.output,
        &view,
        |v| {
            let status = v.status.as_ref().map_or_else(
                || "submitted".to_owned(),
                |s| output::paint_status(s.as_str(), color),
            );
            let mut rows = vec![("Deployment ID", v.deployment_id.clone())];
            if let Some(ref device) = v.device {
                rows.push(("Device", device.clone()));
            }
            if let Some(ref version) = v.version_id {
                rows.push(("Version ID", version.clone()));
            }
            rows.push(("Status", status));
            rows
        },
        |v| v.deployment_id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
