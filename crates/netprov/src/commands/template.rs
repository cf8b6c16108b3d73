//! Template publish and version lookup.

use serde::Serialize;

use netprov_core::{ProvisionConfig, TemplateManager, TemplateSettings};

use crate::cli::{GlobalOpts, TemplateArgs, TemplateCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct VersionView {
    project: String,
    project_id: String,
    template: String,
    version_id: String,
}

pub async fn handle(
    config: &ProvisionConfig,
    args: TemplateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::intent_client(config).await?;

    let view = match args.command {
        TemplateCommand::Publish { file, target } => {
            let content = util::read_text(&file, "file")?;
            let settings = util::template_settings(config, &target);
            let manager = TemplateManager::new(&client, &settings, config.poll);
            let project_id = manager.ensure_project(&settings.project).await?;
            let version_id = manager
                .publish_template(&settings.name, &project_id, &content)
                .await?;
            view(&settings, project_id, version_id)
        }
        TemplateCommand::Latest { target } => {
            let settings = util::template_settings(config, &target);
            let manager = TemplateManager::new(&client, &settings, config.poll);
            let project_id = existing_project(&manager, &settings).await?;
            let version_id = manager.latest_version(&settings.name, &project_id).await?;
            view(&settings, project_id, version_id)
        }
    };

    let out = output::render_single(
        global.output,
        &view,
        |v| {
            vec![
                ("Project", format!("{} ({})", v.project, v.project_id)),
                ("Template", v.template.clone()),
                ("Version ID", v.version_id.clone()),
            ]
        },
        |v| v.version_id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Project id, without creating the project.
pub(super) async fn existing_project(
    manager: &TemplateManager<'_>,
    settings: &TemplateSettings,
) -> Result<String, CliError> {
    manager
        .find_project(&settings.project)
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "Project".into(),
            identifier: settings.project.clone(),
        })
}

fn view(settings: &TemplateSettings, project_id: String, version_id: String) -> VersionView {
    VersionView {
        project: settings.project.clone(),
        project_id,
        template: settings.name.clone(),
        version_id,
    }
}
