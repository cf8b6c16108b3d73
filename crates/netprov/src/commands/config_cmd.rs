//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use netprov_config::{Config, ControllerProfile, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with every plaintext password masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        for controller in [profile.intent.as_mut(), profile.policy.as_mut()]
            .into_iter()
            .flatten()
        {
            if controller.password.is_some() {
                controller.password = Some(MASK.into());
            }
        }
    }
    cfg
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer to store a password in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored
/// in the keyring.
fn prompt_password_storage(
    password: &str,
    profile_name: &str,
    controller: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {controller} password?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        netprov_config::store_password(profile_name, controller, password)?;
        eprintln!("   ✓ {controller} password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

/// Prompt for one controller's URL and credentials.
fn prompt_controller(
    profile_name: &str,
    controller: &str,
    default_url: &str,
) -> Result<ControllerProfile, CliError> {
    let url: String = Input::new()
        .with_prompt(format!("{controller} controller URL"))
        .default(default_url.into())
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if username.is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let password = prompt_password_storage(&password, profile_name, controller)?;
    Ok(ControllerProfile {
        url,
        username: Some(username),
        password,
        password_env: None,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
                        message: e.to_string(),
                    })?
                }
                format => output::render_single(format, &cfg, |_| Vec::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init(global),
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("netprov configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config().unwrap_or_default();

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(config::active_profile_name(global, &cfg))
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Intent controller
    let intent = prompt_controller(&profile_name, "intent", "https://10.1.3.230")?;

    // 3. Policy controller (optional)
    let policy = if Confirm::new()
        .with_prompt("Configure the policy controller for endpoint registration?")
        .default(true)
        .interact()
        .map_err(prompt_err)?
    {
        Some(prompt_controller(&profile_name, "policy", "https://10.1.3.231:9060")?)
    } else {
        None
    };

    // 4. Template location
    let base = netprov_core::TemplateSettings::default();
    let project: String = Input::new()
        .with_prompt("Template project")
        .default(base.project)
        .interact_text()
        .map_err(prompt_err)?;
    let template: String = Input::new()
        .with_prompt("Template name")
        .default(base.name)
        .interact_text()
        .map_err(prompt_err)?;

    // 5. TLS
    let insecure = Confirm::new()
        .with_prompt("Accept self-signed certificates?")
        .default(cfg.defaults.insecure)
        .interact()
        .map_err(prompt_err)?;

    let profile = Profile {
        project: Some(project),
        template: Some(template),
        intent: Some(intent),
        policy,
        insecure: Some(insecure),
        ..Profile::default()
    };
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());

    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: netprov project ensure");
    Ok(())
}
