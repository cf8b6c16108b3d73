//! CLI flag overrides layered on top of `netprov_config` profiles.
//!
//! Precedence: command-line flag or `NETPROV_*` variable, then the selected
//! profile, then built-in defaults.

use secrecy::SecretString;

use netprov_config::{Config, ControllerProfile, Profile};
use netprov_core::ProvisionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use netprov_config::{config_path, load_config, save_config};

/// Name of the profile selected by `--profile` or the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.profile_name(global.profile.as_deref())
}

/// Build the run configuration from the config file, profile, and flags.
pub fn build_provision_config(global: &GlobalOpts) -> Result<ProvisionConfig, CliError> {
    let cfg = load_config()?;
    build_from(&cfg, global)
}

pub(crate) fn build_from(cfg: &Config, global: &GlobalOpts) -> Result<ProvisionConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // Flags alone are enough when they name the intent controller.
        None if global.intent_url.is_some() => Profile::default(),
        None if cfg.profiles.is_empty() => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        None => {
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: names.join(", "),
            });
        }
    };

    apply_overrides(&mut profile, global);

    let mut config =
        netprov_config::profile_to_provision_config(&profile, &profile_name, &cfg.defaults)?;

    // Flag passwords beat env-var and keyring entries.
    if let Some(ref pw) = global.intent_password {
        config.intent.password = SecretString::from(pw.clone());
    }
    if let (Some(pw), Some(policy)) = (&global.policy_password, config.policy.as_mut()) {
        policy.password = SecretString::from(pw.clone());
    }

    Ok(config)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    override_controller(
        &mut profile.intent,
        global.intent_url.as_ref(),
        global.intent_username.as_ref(),
        global.intent_password.as_ref(),
    );
    override_controller(
        &mut profile.policy,
        global.policy_url.as_ref(),
        global.policy_username.as_ref(),
        global.policy_password.as_ref(),
    );
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

fn override_controller(
    slot: &mut Option<ControllerProfile>,
    url: Option<&String>,
    username: Option<&String>,
    password: Option<&String>,
) {
    if slot.is_none() && url.is_none() {
        return;
    }
    let controller = slot.get_or_insert_with(ControllerProfile::default);
    if let Some(url) = url {
        controller.url.clone_from(url);
    }
    if let Some(username) = username {
        controller.username = Some(username.clone());
    }
    if let Some(password) = password {
        controller.password = Some(password.clone());
    }
}
