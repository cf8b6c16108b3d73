use serde::Serialize;

use netprov_core::TemplateManager;

use crate::cli::{GlobalOpts, ProjectArgs, ProjectCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ProjectView {
    name: String,
    id: String,
}

pub async fn handle(
    config: &netprov_core::ProvisionConfig,
    args: ProjectArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProjectCommand::Ensure { name } => {
            let name = name.unwrap_or_else(|| config.template.project.clone());
            let client = util::intent_client(config).await?;
            let manager = TemplateManager::new(&client, &config.template, config.poll);
            let id = manager.ensure_project(&name).await?;

            let view = ProjectView { name, id };
            let out = output::render_single(
                global.output,
                &view,
                |v| vec![("Project", v.name.clone()), ("ID", v.id.clone())],
                |v| v.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
