use serde::Serialize;

use netprov_core::{DeviceSync, ProvisionConfig, TaskResult};

use crate::cli::{DeviceArgs, DeviceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct SyncView {
    hostname: String,
    http_status: u16,
    task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<TaskResult>,
}

pub async fn handle(
    config: &ProvisionConfig,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::intent_client(config).await?;
    let devices = DeviceSync::new(&client, config.poll);

    let out = match args.command {
        DeviceCommand::Show { hostname } => {
            let info = devices.resolve_device(&hostname).await?;
            output::render_single(
                global.output,
                &info,
                |d| {
                    vec![
                        ("ID", d.id.clone()),
                        ("Hostname", d.hostname.clone()),
                        ("Management IP", util::or_dash(d.management_ip.as_deref())),
                        ("Platform", util::or_dash(d.platform.as_deref())),
                        ("Software", util::or_dash(d.software_version.as_deref())),
                        ("Reachability", util::or_dash(d.reachability.as_deref())),
                    ]
                },
                |d| d.id.clone(),
            )
        }
        DeviceCommand::Sync { hostname, wait } => {
            let (http_status, task_id) = devices.sync(&hostname).await?;
            let result = if wait {
                Some(devices.task_result(&task_id).await?)
            } else {
                None
            };
            if result == Some(TaskResult::Failure) {
                return Err(CliError::Provisioning {
                    stage: "Device sync".into(),
                    message: format!("sync task {task_id} for {hostname} reported FAILURE"),
                });
            }
            let view = SyncView {
                hostname,
                http_status,
                task_id,
                result,
            };
            let color = util::color(global);
            output::render_single(
                global.output,
                &view,
                |v| {
                    let mut rows = vec![
                        ("Hostname", v.hostname.clone()),
                        ("HTTP Status", v.http_status.to_string()),
                        ("Task ID", v.task_id.clone()),
                    ];
                    if let Some(result) = v.result {
                        rows.push(("Result", output::paint_status(result.as_ref(), color)));
                    }
                    rows
                },
                |v| v.task_id.clone(),
            )
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
