//! `netprov run`: the end-to-end workflow.

use netprov_core::{Progress, ProvisionConfig, ProvisionDescriptor, Provisioner, SilentProgress};

use crate::cli::{GlobalOpts, OutputFormat, RunArgs};
use crate::error::CliError;
use crate::output;
use crate::progress::StageProgress;

use super::util;

pub async fn handle(
    config: ProvisionConfig,
    args: RunArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let template = util::read_text(&args.template, "template")?;
    let descriptor_text = util::read_text(&args.descriptor, "descriptor")?;
    let descriptor = ProvisionDescriptor::from_json(&descriptor_text)?;
    tracing::info!(
        switch = %descriptor.switch_name,
        vlan = descriptor.vlan,
        group = %descriptor.endpoint_group,
        "starting provisioning run"
    );

    let color = util::color(global);
    // Progress lines share stdout with the table.
    let progress: Box<dyn Progress> = if global.quiet || global.output != OutputFormat::Table {
        Box::new(SilentProgress)
    } else {
        Box::new(StageProgress::new(color))
    };

    let report = Provisioner::new(config)
        .run(&template, &descriptor, progress.as_ref())
        .await?;
    drop(progress);

    let out = output::render_single(
        global.output,
        &report,
        |r| {
            vec![
                ("Project ID", r.project_id.clone()),
                ("Template Version", r.template_version_id.clone()),
                ("Deployment ID", r.deployment_id.clone()),
                (
                    "Deployment",
                    output::paint_status(r.deployment_status.as_str(), color),
                ),
                ("Sync Task", format!("{} (HTTP {})", r.sync_task_id, r.sync_status)),
                ("Sync", output::paint_status(r.sync_result.as_ref(), color)),
                (
                    "Endpoint",
                    format!(
                        "{} (HTTP {})",
                        output::paint_status(&r.registration.outcome.to_string(), color),
                        r.registration.status
                    ),
                ),
                (
                    "Duration",
                    format!(
                        "{:.1}s",
                        (r.finished_at - r.started_at)
                            .to_std()
                            .map_or(0.0, |d| d.as_secs_f64())
                    ),
                ),
            ]
        },
        |r| r.deployment_id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
