//! Mute command handlers.

use vizlo_core::Controller;

use crate::cli::{GlobalOpts, MuteArgs, MuteCommand};
use crate::error::CliError;

pub async fn handle(
    controller: &Controller,
    args: MuteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mute = controller.mute();
    let message = match args.command {
        MuteCommand::On => {
            mute.turn_on().await?;
            "Muted"
        }
        MuteCommand::Off => {
            mute.turn_off().await?;
            "Unmuted"
        }
    };
    if !global.quiet {
        eprintln!("{message}");
    }
    Ok(())
}
