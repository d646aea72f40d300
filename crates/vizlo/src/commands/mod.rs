//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod mute;
pub mod pair;
pub mod power;
pub mod settings;
pub mod source;
pub mod status;
pub mod util;
pub mod watch;

use std::time::Duration;

use vizlo_core::{Controller, DeviceConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
///
/// `watch` keeps the scheduler running; everything else connects once,
/// runs, and disconnects.
pub async fn dispatch(
    cmd: Command,
    mut device: DeviceConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Watch(ref args) = cmd {
        if let Some(secs) = args.interval {
            device.poll_interval = Duration::from_secs(secs.max(1));
        }
    }
    let controller = Controller::new(device)?;

    match cmd {
        Command::Watch(args) => watch::handle(&controller, args, global).await,
        cmd => {
            controller.connect_once().await?;
            let result = run_once(&controller, cmd, global).await;
            controller.disconnect().await;
            result
        }
    }
}

async fn run_once(controller: &Controller, cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(controller, global),
        Command::Settings(args) => settings::handle(controller, args, global).await,
        Command::Mute(args) => mute::handle(controller, args, global).await,
        Command::Power(args) => power::handle(controller, args, global).await,
        Command::Source(args) => source::handle(controller, args, global).await,
        // Handled before dispatch
        Command::Watch(_) | Command::Pair(_) | Command::Config(_) | Command::Completions(_) => {
            Ok(())
        }
    }
}
