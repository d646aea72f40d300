//! `vizlo status`: everything the last poll learned, in one view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vizlo_core::{Controller, PowerAttributes, PowerState, SelectOption};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::settings::{self, SettingRow, SettingView};
use super::util;

#[derive(Serialize)]
struct StatusView {
    host: String,
    power: Option<PowerState>,
    #[serde(flatten)]
    attributes: PowerAttributes,
    source: Option<String>,
    settings: Vec<SettingView>,
    failed_reads: usize,
    taken_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    age: String,
}

pub fn handle(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = controller.snapshot();
    let view = StatusView {
        host: controller.config().host.clone(),
        power: snap.power,
        attributes: controller.power().attributes(),
        source: controller.source().current_option(),
        settings: settings::polled(controller),
        failed_reads: snap.failed_reads,
        taken_at: snap.taken_at,
        age: util::snapshot_age(&snap),
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

fn detail(v: &StatusView, color: bool) -> String {
    let power = match v.power {
        Some(PowerState::On) => output::paint_state("on", true, color),
        Some(PowerState::Off) => output::paint_state("off", false, color),
        None => "unknown".into(),
    };
    let mode = v
        .attributes
        .power_mode
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default();

    let mut lines = vec![
        format!("Host:     {}", v.host),
        format!("Power:    {power}{mode}"),
        format!("Source:   {}", v.source.as_deref().unwrap_or("-")),
    ];
    let mut polled = format!("Polled:   {}", v.age);
    if v.failed_reads > 0 {
        polled.push_str(&format!(" ({} failed reads)", v.failed_reads));
    }
    lines.push(polled);
    if let Some(warning) = v.attributes.warning {
        lines.push(output::paint_warning(warning, color));
    }

    let rows: Vec<SettingRow> = v.settings.iter().map(SettingRow::from).collect();
    lines.push(String::new());
    lines.push(
        tabled::Table::new(rows)
            .with(tabled::settings::Style::rounded())
            .to_string(),
    );
    lines.join("\n")
}
