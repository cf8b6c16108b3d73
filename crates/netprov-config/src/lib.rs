//! Configuration for the netprov CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `netprov_core::ProvisionConfig`. The CLI layers its
//! global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netprov_core::{
    ControllerEndpoint, EndpointSettings, PollPolicy, ProvisionConfig, TemplateSettings,
    TlsVerification,
};

/// Keyring service name for stored controller passwords.
pub const KEYRING_SERVICE: &str = "netprov";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for the {controller} controller in profile '{profile}'")]
    NoCredentials { profile: String, controller: String },

    #[error("profile '{0}' not found in config")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named environment profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit choice, else `default_profile`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Accept self-signed controller certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub poll: PollDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: default_insecure(),
            timeout: default_timeout(),
            poll: PollDefaults::default(),
        }
    }
}

fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

/// Backoff schedule for every controller wait.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct PollDefaults {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollDefaults {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PollDefaults {
    pub fn to_policy(self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            max_attempts: self.max_attempts,
        }
    }
}

fn default_initial_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    30_000
}
fn default_max_attempts() -> u32 {
    60
}

/// A named environment: both controllers plus template and endpoint
/// metadata.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Template-programmer project name.
    pub project: Option<String>,

    /// CLI template name.
    pub template: Option<String>,

    /// Template author recorded on creation.
    pub author: Option<String>,

    /// Template description.
    pub description: Option<String>,

    /// Comment attached to each template commit.
    pub commit_comment: Option<String>,

    /// Network intent controller.
    pub intent: Option<ControllerProfile>,

    /// Policy controller (needed only for endpoint registration).
    pub policy: Option<ControllerProfile>,

    /// Metadata for registered endpoints.
    pub endpoint: Option<EndpointProfile>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

/// URL and credentials for one controller.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ControllerProfile {
    pub url: String,

    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EndpointProfile {
    pub profile_id: Option<String>,
    pub description: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netprov", "netprov").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netprov");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment.
///
/// Environment keys nest on a double underscore, e.g.
/// `NETPROV_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETPROV_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Keyring entry name for a controller password.
pub fn keyring_key(profile_name: &str, controller: &str) -> String {
    format!("{profile_name}/{controller}-password")
}

/// Store a controller password in the system keyring.
pub fn store_password(
    profile_name: &str,
    controller: &str,
    password: &str,
) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name, controller))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Resolve a controller password from the credential chain.
pub fn resolve_password(
    controller: &ControllerProfile,
    profile_name: &str,
    controller_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(ref env_name) = controller.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) =
        keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name, controller_name))
    {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = controller.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        controller: controller_name.into(),
    })
}

/// URL + username + resolved password for one controller.
pub fn resolve_endpoint(
    controller: &ControllerProfile,
    profile_name: &str,
    controller_name: &str,
) -> Result<ControllerEndpoint, ConfigError> {
    let url: url::Url = controller
        .url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: format!("{controller_name}.url"),
            reason: format!("invalid URL: {}", controller.url),
        })?;
    let username = controller
        .username
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            controller: controller_name.into(),
        })?;
    let password = resolve_password(controller, profile_name, controller_name)?;
    Ok(ControllerEndpoint {
        url,
        username,
        password,
    })
}

/// Build a `ProvisionConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_provision_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ProvisionConfig, ConfigError> {
    let intent_profile = profile
        .intent
        .as_ref()
        .ok_or_else(|| ConfigError::Validation {
            field: "intent".into(),
            reason: format!("profile '{profile_name}' has no [intent] controller"),
        })?;
    let intent = resolve_endpoint(intent_profile, profile_name, "intent")?;
    let policy = profile
        .policy
        .as_ref()
        .map(|p| resolve_endpoint(p, profile_name, "policy"))
        .transpose()?;

    // A profile CA bundle outranks the global insecure default, but not an
    // explicit `insecure = true` on the profile.
    let tls = match (&profile.ca_cert, profile.insecure) {
        (_, Some(true)) => TlsVerification::DangerAcceptInvalid,
        (Some(ca_path), _) => TlsVerification::CustomCa(ca_path.clone()),
        (None, insecure) if insecure.unwrap_or(defaults.insecure) => {
            TlsVerification::DangerAcceptInvalid
        }
        (None, _) => TlsVerification::SystemDefaults,
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    let base = TemplateSettings::default();
    let template = TemplateSettings {
        project: profile.project.clone().unwrap_or(base.project),
        name: profile.template.clone().unwrap_or(base.name),
        author: profile.author.clone().unwrap_or(base.author),
        description: profile.description.clone().unwrap_or(base.description),
        commit_comment: profile.commit_comment.clone().unwrap_or(base.commit_comment),
    };

    let base = EndpointSettings::default();
    let endpoint = match &profile.endpoint {
        Some(e) => EndpointSettings {
            profile_id: e.profile_id.clone().unwrap_or(base.profile_id),
            description: e.description.clone().unwrap_or(base.description),
        },
        None => base,
    };

    Ok(ProvisionConfig {
        intent,
        policy,
        tls,
        timeout,
        poll: defaults.poll.to_policy(),
        template,
        endpoint,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
timeout = 45
insecure = false

[defaults.poll]
initial_delay_ms = 500
max_attempts = 10

[profiles.lab]
project = "Campus"
template = "pos_vlan"
ca_cert = "/etc/netprov/ca.pem"

[profiles.lab.intent]
url = "https://10.1.3.230"
username = "admin"
password = "plain-intent"
password_env = "NETPROV_TEST_UNSET_INTENT_PASSWORD"

[profiles.lab.policy]
url = "https://ise.lab:9060"
username = "ersadmin"
password = "plain-policy"

[profiles.lab.endpoint]
description = "Register 7"
"#;

    fn load(text: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, text).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.defaults.insecure);
        assert_eq!(cfg.defaults.poll, PollDefaults::default());
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn loads_profile_from_file() {
        let cfg = load(SAMPLE);
        assert_eq!(cfg.profile_name(None), "lab");
        assert_eq!(cfg.profile_name(Some("prod")), "prod");
        assert_eq!(cfg.defaults.timeout, 45);
        assert_eq!(cfg.defaults.poll.initial_delay_ms, 500);
        assert_eq!(cfg.defaults.poll.max_delay_ms, 30_000);
        let lab = cfg.profile("lab").unwrap();
        assert_eq!(lab.project.as_deref(), Some("Campus"));
        assert!(matches!(cfg.profile("prod"), Err(ConfigError::UnknownProfile(_))));
    }

    #[test]
    fn builds_provision_config() {
        let cfg = load(SAMPLE);
        let lab = cfg.profile("lab").unwrap();
        let pc = profile_to_provision_config(lab, "lab", &cfg.defaults).unwrap();

        assert_eq!(pc.intent.url.as_str(), "https://10.1.3.230/");
        // unset env var falls through to the plaintext password
        assert_eq!(pc.intent.password.expose_secret(), "plain-intent");
        assert_eq!(pc.policy.as_ref().unwrap().username, "ersadmin");
        assert_eq!(
            pc.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/netprov/ca.pem"))
        );
        assert_eq!(pc.timeout, Duration::from_secs(45));
        assert_eq!(pc.poll.initial_delay, Duration::from_millis(500));
        assert_eq!(pc.poll.max_attempts, 10);
        assert_eq!(pc.template.project, "Campus");
        assert_eq!(pc.template.name, "pos_vlan");
        assert_eq!(pc.template.author, "apiuser");
        assert_eq!(pc.endpoint.description, "Register 7");
        assert_eq!(
            pc.endpoint.profile_id,
            "ffafa000-8bff-11e6-996c-525400b48521"
        );
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        let controller = ControllerProfile {
            url: "https://dnac".into(),
            username: Some("admin".into()),
            password: Some("plain".into()),
            // PATH is set in any test environment
            password_env: Some("PATH".into()),
        };
        let secret = resolve_password(&controller, "env-test", "intent").unwrap();
        assert_eq!(secret.expose_secret(), std::env::var("PATH").unwrap());
    }

    #[test]
    fn missing_password_is_no_credentials() {
        let controller = ControllerProfile {
            url: "https://dnac".into(),
            username: Some("admin".into()),
            password: None,
            password_env: None,
        };
        let err = resolve_password(&controller, "netprov-test-nokeyring", "intent").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn missing_intent_section_is_validation_error() {
        let err =
            profile_to_provision_config(&Profile::default(), "empty", &Defaults::default())
                .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "intent"));
    }

    fn intent_only() -> Profile {
        Profile {
            intent: Some(ControllerProfile {
                url: "https://dnac".into(),
                username: Some("admin".into()),
                password: Some("pw".into()),
                password_env: None,
            }),
            ..Profile::default()
        }
    }

    #[test]
    fn insecure_default_accepts_self_signed() {
        let pc = profile_to_provision_config(&intent_only(), "p", &Defaults::default()).unwrap();
        assert_eq!(pc.tls, TlsVerification::DangerAcceptInvalid);
        assert!(pc.policy.is_none());
    }

    #[test]
    fn profile_ca_cert_beats_insecure_default() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/netprov/ca.pem")),
            ..intent_only()
        };
        let pc = profile_to_provision_config(&profile, "p", &Defaults::default()).unwrap();
        assert_eq!(
            pc.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/netprov/ca.pem"))
        );

        let profile = Profile {
            insecure: Some(true),
            ..profile
        };
        let pc = profile_to_provision_config(&profile, "p", &Defaults::default()).unwrap();
        assert_eq!(pc.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn secure_profile_without_ca_uses_system_roots() {
        let profile = Profile {
            insecure: Some(false),
            ..intent_only()
        };
        let pc = profile_to_provision_config(&profile, "p", &Defaults::default()).unwrap();
        assert_eq!(pc.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn save_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                project: Some("IBN".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profile("lab").unwrap().project.as_deref(),
            Some("IBN")
        );
    }
}
