use netprov_core::{ProvisionConfig, TaskResult, TaskWatcher};

use crate::cli::{GlobalOpts, TaskArgs, TaskCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    config: &ProvisionConfig,
    args: TaskArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::intent_client(config).await?;
    let watcher = TaskWatcher::new(&client, config.poll);

    match args.command {
        TaskCommand::Show { id } => {
            let task = watcher.fetch(&id).await?;
            let color = util::color(global);
            let out = output::render_single(
                global.output,
                &task,
                |t| {
                    let state = if t.is_complete() {
                        output::paint_status(TaskResult::of(t).as_ref(), color)
                    } else {
                        "RUNNING".to_owned()
                    };
                    vec![
                        ("ID", id.clone()),
                        ("State", state),
                        ("Progress", util::or_dash(t.progress.as_deref())),
                        ("Data", util::or_dash(t.data_str())),
                        ("Failure Reason", util::or_dash(t.failure_reason.as_deref())),
                    ]
                },
                |t| TaskResult::of(t).to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
