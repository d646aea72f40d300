//! Power command handlers.

use serde::Serialize;
use vizlo_core::{Controller, PowerAttributes, PowerOutcome, PowerState};

use crate::cli::{GlobalOpts, PowerArgs, PowerCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct PowerView {
    power: Option<PowerState>,
    #[serde(flatten)]
    attributes: PowerAttributes,
}

pub async fn handle(
    controller: &Controller,
    args: PowerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PowerCommand::On => match controller.power().turn_on().await? {
            PowerOutcome::Blocked { mode } => Err(CliError::PowerBlocked {
                mode: mode.to_string(),
            }),
            PowerOutcome::Sent { .. } => {
                if !global.quiet {
                    eprintln!("Power on sent");
                }
                Ok(())
            }
        },

        PowerCommand::Off => {
            controller.power().turn_off().await?;
            if !global.quiet {
                eprintln!("Power off sent");
            }
            Ok(())
        }

        PowerCommand::Status => {
            let view = PowerView {
                power: controller.snapshot().power,
                attributes: controller.power().attributes(),
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &view,
                |v| detail(v, color),
                |v| {
                    v.power
                        .map_or_else(|| "unknown".into(), |p| p.to_string())
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn detail(v: &PowerView, color: bool) -> String {
    let state = match v.power {
        Some(PowerState::On) => output::paint_state("on", true, color),
        Some(PowerState::Off) => output::paint_state("off", false, color),
        None => "unknown".into(),
    };
    let mut lines = vec![
        format!("Power:    {state}"),
        format!(
            "Mode:     {}",
            v.attributes.power_mode.as_deref().unwrap_or("-")
        ),
    ];
    if let Some(warning) = v.attributes.warning {
        lines.push(output::paint_warning(warning, color));
    }
    lines.join("\n")
}
