// ── Runtime provisioning configuration ──
//
// These types describe which controllers to talk to and with what
// credentials, plus the fixed template and endpoint metadata. They never
// touch disk: the CLI resolves profiles and hands a `ProvisionConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use netprov_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::poll::PollPolicy;

/// Base URL plus basic credentials for one controller.
#[derive(Debug, Clone)]
pub struct ControllerEndpoint {
    pub url: Url,
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Lab controllers ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Where and how the CLI template is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    /// Template-programmer project holding the template.
    pub project: String,
    /// Template name, unique within the project.
    pub name: String,
    pub author: String,
    pub description: String,
    pub commit_comment: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            project: "IBN".into(),
            name: "vlan_template".into(),
            author: "apiuser".into(),
            description: "Configure new VLAN".into(),
            commit_comment: "committed by netprov".into(),
        }
    }
}

/// Fixed metadata attached to every registered endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    pub profile_id: String,
    pub description: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            profile_id: "ffafa000-8bff-11e6-996c-525400b48521".into(),
            description: "POS1".into(),
        }
    }
}

/// Everything a provisioning run needs.
///
/// Built by the CLI, passed to the components -- core never reads config
/// files. `policy` is optional so intent-only commands work without
/// policy controller credentials.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub intent: ControllerEndpoint,
    pub policy: Option<ControllerEndpoint>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub poll: PollPolicy,
    pub template: TemplateSettings,
    pub endpoint: EndpointSettings,
}

impl ProvisionConfig {
    /// Transport settings shared by both controller clients.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
