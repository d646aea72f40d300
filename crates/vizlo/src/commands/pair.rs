//! `vizlo pair`: PIN pairing and token storage.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use vizlo_core::Pairing;

use crate::cli::{GlobalOpts, PairArgs};
use crate::config::{self, Profile};
use crate::error::CliError;

use super::util::prompt_err;

pub async fn handle(args: PairArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = config::resolve_pairing_target(global)?;
    let device_id = args
        .device_id
        .unwrap_or_else(|| format!("vizlo-{}", uuid::Uuid::new_v4().simple()));
    debug!(host = %target.host, %device_id, "pairing");

    let pairing = Pairing::new(&target, device_id.as_str(), args.device_name.as_str())?;
    let challenge = pairing.start().await?;
    eprintln!("A PIN is now displayed on {}.", target.host);

    let pin = match Input::<String>::new().with_prompt("PIN").interact_text() {
        Ok(pin) => pin,
        Err(e) => {
            // Leave the television showing nothing rather than a stale PIN.
            let _ = pairing.cancel(challenge).await;
            return Err(prompt_err(e));
        }
    };
    if pin.trim().is_empty() {
        let _ = pairing.cancel(challenge).await;
        return Err(CliError::Validation {
            field: "pin".into(),
            reason: "PIN cannot be empty".into(),
        });
    }

    let token = pairing.finish(challenge, &pin).await?;
    eprintln!("✓ Paired with {}", target.host);

    if args.print {
        println!("{}", token.expose_secret());
        return Ok(());
    }
    store_token(global, &target.host, target.port, &device_id, &token)
}

fn store_token(
    global: &GlobalOpts,
    host: &str,
    port: u16,
    device_id: &str,
    token: &SecretString,
) -> Result<(), CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
        "Print it",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the auth token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 2 {
        println!("{}", token.expose_secret());
        return Ok(());
    }

    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = cfg
        .profiles
        .entry(profile_name.clone())
        .or_insert_with(Profile::default);
    profile.host = host.to_owned();
    profile.port = Some(port);
    profile.device_id = Some(device_id.to_owned());

    if selection == 0 {
        vizlo_config::store_auth_token(&profile_name, token.expose_secret())?;
        profile.auth_token = None;
        eprintln!("   ✓ Token stored in system keyring");
    } else {
        profile.auth_token = Some(token.expose_secret().to_owned());
    }
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }

    config::save_config(&cfg)?;
    eprintln!("✓ Profile '{profile_name}' saved to {}", config::config_path().display());
    Ok(())
}
