//! Shared helpers for command handlers.

use std::path::Path;

use netprov_api::IntentClient;
use netprov_core::{Authenticator, ProvisionConfig, TemplateSettings};

use crate::cli::{GlobalOpts, TemplateTarget};
use crate::error::CliError;
use crate::output;

/// Log in to the intent controller.
pub async fn intent_client(config: &ProvisionConfig) -> Result<IntentClient, CliError> {
    Ok(Authenticator::from_config(config).connect().await?)
}

/// Profile template settings with `--name` / `--project` applied.
pub fn template_settings(config: &ProvisionConfig, target: &TemplateTarget) -> TemplateSettings {
    let mut settings = config.template.clone();
    if let Some(ref name) = target.name {
        settings.name.clone_from(name);
    }
    if let Some(ref project) = target.project {
        settings.project.clone_from(project);
    }
    settings
}

/// Read a UTF-8 input file, naming the flag in the error.
pub fn read_text(path: &Path, field: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("cannot read {}: {e}", path.display()),
    })
}

pub fn color(global: &GlobalOpts) -> bool {
    output::should_color(global.color)
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}
