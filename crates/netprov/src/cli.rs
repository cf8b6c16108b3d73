//! Clap derive structures for the `netprov` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by `build.rs` for man page generation, so it may only depend
//! on clap and std.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netprov -- network provisioning from the command line
#[derive(Debug, Parser)]
#[command(
    name = "netprov",
    version,
    about = "Provision switch VLANs and endpoint access through your network controllers",
    long_about = "Publishes a CLI template to the network intent controller, deploys it to a \
        switch, forces a configuration sync, and registers the client MAC address in a \
        policy controller endpoint group.\n\n\
        Run the whole workflow with `netprov run`, or drive each stage on its own.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "NETPROV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Intent controller URL (overrides profile)
    #[arg(long, env = "NETPROV_INTENT_URL", global = true)]
    pub intent_url: Option<String>,

    /// Intent controller username (overrides profile)
    #[arg(long, env = "NETPROV_INTENT_USERNAME", global = true)]
    pub intent_username: Option<String>,

    /// Intent controller password
    #[arg(long, env = "NETPROV_INTENT_PASSWORD", global = true, hide_env_values = true)]
    pub intent_password: Option<String>,

    /// Policy controller URL (overrides profile)
    #[arg(long, env = "NETPROV_POLICY_URL", global = true)]
    pub policy_url: Option<String>,

    /// Policy controller username (overrides profile)
    #[arg(long, env = "NETPROV_POLICY_USERNAME", global = true)]
    pub policy_username: Option<String>,

    /// Policy controller password
    #[arg(long, env = "NETPROV_POLICY_PASSWORD", global = true, hide_env_values = true)]
    pub policy_password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETPROV_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NETPROV_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "NETPROV_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Debug log file; pass an empty value to disable
    #[arg(long, env = "NETPROV_LOG_FILE", default_value = "netprov_run.log", global = true)]
    pub log_file: PathBuf,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full provisioning workflow
    Run(RunArgs),

    /// Template-programmer projects
    Project(ProjectArgs),

    /// Publish and inspect CLI templates
    #[command(alias = "tpl")]
    Template(TemplateArgs),

    /// Deploy templates and check deployments
    Deploy(DeployArgs),

    /// Inventory lookup and config sync
    #[command(alias = "dev")]
    Device(DeviceArgs),

    /// Inspect controller tasks
    Task(TaskArgs),

    /// Policy controller endpoint groups and endpoints
    #[command(alias = "ep")]
    Endpoint(EndpointArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// CLI template text file
    #[arg(long, short = 't')]
    pub template: PathBuf,

    /// Provisioning descriptor (JSON: vlan, switchName, switchport,
    /// endpointGroup, macAddress)
    #[arg(long, short = 'd')]
    pub descriptor: PathBuf,
}

// ── Project ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Print the project id, creating the project if needed
    Ensure {
        /// Project name (defaults to the profile's project)
        name: Option<String>,
    },
}

// ── Template ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Replace, create, and commit a template from a file
    Publish {
        /// CLI template text file
        #[arg(long, short = 'f')]
        file: PathBuf,

        #[command(flatten)]
        target: TemplateTarget,
    },

    /// Print the newest committed version id
    Latest {
        #[command(flatten)]
        target: TemplateTarget,
    },
}

/// Template name and project, defaulting to the profile's values.
#[derive(Debug, Args)]
pub struct TemplateTarget {
    /// Template name
    #[arg(long)]
    pub name: Option<String>,

    /// Project name
    #[arg(long)]
    pub project: Option<String>,
}

// ── Deploy ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeployArgs {
    #[command(subcommand)]
    pub command: DeployCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeployCommand {
    /// Deploy the latest template version to a device
    Apply {
        /// Target device hostname
        #[arg(long)]
        device: String,

        /// VLAN id (1-4094)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=4094))]
        vlan: u16,

        /// Switchport, e.g. GigabitEthernet1/0/6
        #[arg(long)]
        switchport: String,

        /// Return after submitting instead of waiting for a final status
        #[arg(long)]
        no_wait: bool,

        #[command(flatten)]
        target: TemplateTarget,
    },

    /// Show the status of a deployment
    Status {
        /// Deployment id
        id: String,
    },
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Show inventory details for a device
    Show {
        /// Device hostname
        hostname: String,
    },

    /// Force a configuration sync
    Sync {
        /// Device hostname
        hostname: String,

        /// Wait for the sync task and report its result
        #[arg(long, short = 'w')]
        wait: bool,
    },
}

// ── Task ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Show a task's current state
    Show {
        /// Task id
        id: String,
    },
}

// ── Endpoint ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EndpointArgs {
    #[command(subcommand)]
    pub command: EndpointCommand,
}

#[derive(Debug, Subcommand)]
pub enum EndpointCommand {
    /// Print the id of an endpoint group
    Group {
        /// Endpoint group name
        name: String,
    },

    /// Add a MAC address to an endpoint group
    Register {
        /// Client MAC address
        mac: String,

        /// Endpoint group name
        #[arg(long, short = 'g')]
        group: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the current configuration (passwords masked)
    Show,

    /// Interactive configuration wizard
    Init,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
