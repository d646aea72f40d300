//! CLI configuration: thin wrapper around `vizlo_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--host, --port, --token, --insecure, --timeout).

use secrecy::SecretString;

use vizlo_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use vizlo_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `DeviceConfig` from the config file, profile, and CLI overrides.
pub fn resolve_device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let cfg = vizlo_config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly named profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        // No profile: run from flags / env vars alone.
        None if global.host.is_some() => Profile::default(),
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let profile = apply_overrides(profile, global);
    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => vizlo_config::resolve_auth_token(&profile, &profile_name)?,
    };

    Ok(vizlo_config::device_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        token,
    )?)
}

/// Like [`resolve_device_config`], but without requiring a token. Used by
/// `pair`, which runs before one exists.
pub fn resolve_pairing_target(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();
    let profile = apply_overrides(profile, global);

    Ok(vizlo_config::device_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        SecretString::from(String::new()),
    )?)
}

/// Flags beat profile values.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(port) = global.port {
        profile.port = Some(port);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = Some(true);
        profile.ca_cert = None;
    }
    profile
}
