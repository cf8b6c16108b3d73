//! Command dispatch: bridges CLI args -> core components -> output formatting.

pub mod config_cmd;
pub mod deploy;
pub mod device;
pub mod endpoint;
pub mod project;
pub mod run;
pub mod task;
pub mod template;
pub mod util;

use netprov_core::ProvisionConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: ProvisionConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(config, args, global).await,
        Command::Project(args) => project::handle(&config, args, global).await,
        Command::Template(args) => template::handle(&config, args, global).await,
        Command::Deploy(args) => deploy::handle(&config, args, global).await,
        Command::Device(args) => device::handle(&config, args, global).await,
        Command::Task(args) => task::handle(&config, args, global).await,
        Command::Endpoint(args) => endpoint::handle(&config, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "does not need a controller".into(),
        }),
    }
}
