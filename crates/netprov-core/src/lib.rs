// netprov-core: Provisioning workflow between netprov-api and the CLI.

pub mod access;
pub mod auth;
pub mod config;
pub mod deploy;
pub mod descriptor;
pub mod error;
pub mod poll;
pub mod sync;
pub mod task;
pub mod template;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use access::{AccessRegistrar, Registration, RegistrationOutcome};
pub use auth::Authenticator;
pub use config::{
    ControllerEndpoint, EndpointSettings, ProvisionConfig, TemplateSettings, TlsVerification,
};
pub use deploy::{DeployParams, DeploymentDriver, DeploymentStatus, parse_deployment_id};
pub use descriptor::{MacAddress, ProvisionDescriptor};
pub use error::CoreError;
pub use poll::PollPolicy;
pub use sync::{DeviceInfo, DeviceSync};
pub use task::{TaskResult, TaskWatcher};
pub use template::{TemplateManager, select_latest_version};
pub use workflow::{Progress, ProvisionReport, Provisioner, SilentProgress, Step};
