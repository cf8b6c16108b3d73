//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use netprov_config::ConfigError;
use netprov_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PROVISIONING: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(netprov::connection_failed),
        help(
            "Check that the controller is reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(netprov::auth_failed),
        help(
            "Verify the controller username and password.\n\
             Re-run: netprov config init"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for the {controller} controller in profile '{profile}'")]
    #[diagnostic(
        code(netprov::no_credentials),
        help(
            "Configure credentials with: netprov config init\n\
             Or pass --{controller}-username and --{controller}-password."
        )
    )]
    NoCredentials { profile: String, controller: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(netprov::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{endpoint} returned HTTP {status}")]
    #[diagnostic(code(netprov::api_error), help("Response body: {body}"))]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    // ── Provisioning ─────────────────────────────────────────────────
    #[error("{stage} failed: {message}")]
    #[diagnostic(
        code(netprov::provisioning),
        help("Details are in the debug log (--log-file).")
    )]
    Provisioning { stage: String, message: String },

    #[error("Timed out waiting for {operation} after {attempts} attempts")]
    #[diagnostic(
        code(netprov::timeout),
        help("Raise defaults.poll.max_attempts in the config, or check the controller.")
    )]
    Timeout { operation: String, attempts: u32 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netprov::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(netprov::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: netprov config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(netprov::no_config),
        help(
            "Create one with: netprov config init\n\
             Expected at: {path}\n\
             Or pass --intent-url with --intent-username and --intent-password."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(netprov::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(netprov::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Provisioning { .. } => exit_code::PROVISIONING,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let stage = |stage: &str, message: String| CliError::Provisioning {
            stage: stage.into(),
            message,
        };
        match err {
            CoreError::Auth { message } => CliError::AuthFailed { message },
            CoreError::Project { message } => stage("Project setup", message),
            CoreError::Template { message } => stage("Template publish", message),
            CoreError::Deployment { message } => stage("Deployment", message),
            CoreError::Sync { message } => stage("Device sync", message),
            CoreError::Lookup { kind, name } => CliError::NotFound {
                resource_type: kind.into(),
                identifier: name,
            },
            CoreError::Timeout {
                operation,
                attempts,
            } => CliError::Timeout {
                operation,
                attempts,
            },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Api {
                endpoint,
                status,
                body,
            } => CliError::Api {
                endpoint,
                status,
                body,
            },
            CoreError::UnexpectedResponse { endpoint, message } => {
                stage("Controller call", format!("{endpoint}: {message}"))
            }
            CoreError::Descriptor { message } => CliError::Validation {
                field: "descriptor".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials {
                profile,
                controller,
            } => CliError::NoCredentials {
                profile,
                controller,
            },
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_errors_map_to_provisioning_exit_code() {
        let err = CliError::from(CoreError::Deployment {
            message: "FAILURE".into(),
        });
        assert_eq!(err.exit_code(), exit_code::PROVISIONING);
        assert_eq!(err.to_string(), "Deployment failed: FAILURE");
    }

    #[test]
    fn lookup_maps_to_not_found() {
        let err = CliError::from(CoreError::Lookup {
            kind: "Endpoint group",
            name: "POS".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "Endpoint group 'POS' not found");
    }

    #[test]
    fn timeout_and_auth_codes() {
        let timeout = CliError::from(CoreError::Timeout {
            operation: "task t-1".into(),
            attempts: 60,
        });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
        let auth = CliError::from(CoreError::Auth {
            message: "401".into(),
        });
        assert_eq!(auth.exit_code(), exit_code::AUTH);
    }
}
