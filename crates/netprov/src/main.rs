mod cli;
mod commands;
mod config;
mod error;
mod output;
mod progress;

use std::path::Path;

use clap::Parser;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Held until exit so the debug log is flushed
    let _guard = init_tracing(&cli.global);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        tracing::error!(error = %err, "command failed");
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Terse stderr output driven by `-v`, plus a full debug log file.
fn init_tracing(global: &GlobalOpts) -> Option<WorkerGuard> {
    let level = match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)));

    let (file_layer, guard) = match log_file_parts(&global.log_file) {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let targets = Targets::new()
                .with_target("netprov", Level::DEBUG)
                .with_target("netprov_core", Level::DEBUG)
                .with_target("netprov_api", Level::DEBUG)
                .with_target("netprov_config", Level::DEBUG);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(targets);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Split `--log-file` into directory and file name; `None` disables it.
fn log_file_parts(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let name = path.file_name()?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Some((dir, name))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need controller credentials
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netprov", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to at least one controller
        cmd => {
            let provision = config::build_provision_config(&cli.global)?;
            tracing::debug!(command = ?cmd, intent = %provision.intent.url, "dispatching command");
            commands::dispatch(cmd, provision, &cli.global).await
        }
    }
}
