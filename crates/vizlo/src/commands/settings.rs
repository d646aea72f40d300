//! Setting command handlers.

use std::str::FromStr;

use serde::Serialize;
use tabled::Tabled;
use vizlo_core::{
    Controller, MutationToken, NumberRange, SetValue, SettingCategory, SettingKey, SettingReading,
    SettingValue,
};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── View types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct SettingView {
    pub key: SettingKey,
    /// `None` when the last poll could not read it.
    pub value: Option<SettingValue>,
    pub token: Option<MutationToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<NumberRange>,
}

impl SettingView {
    fn read(key: SettingKey, reading: SettingReading, range: Option<NumberRange>) -> Self {
        Self {
            key,
            value: Some(reading.value),
            token: Some(reading.token),
            range,
        }
    }
}

#[derive(Tabled)]
pub(super) struct SettingRow {
    #[tabled(rename = "Setting")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Range")]
    range: String,
}

impl From<&SettingView> for SettingRow {
    fn from(v: &SettingView) -> Self {
        Self {
            key: v.key.to_string(),
            value: v
                .value
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
            range: v.range.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

/// Every polled setting, in poll order. Failed reads appear without a value.
pub(super) fn polled(controller: &Controller) -> Vec<SettingView> {
    let snap = controller.snapshot();
    controller
        .cache()
        .plan()
        .settings
        .iter()
        .map(|key| {
            let reading = snap.setting(key);
            SettingView {
                key: key.clone(),
                value: reading.map(|r| r.value.clone()),
                token: reading.map(|r| r.token),
                range: controller.number(key).map(vizlo_core::NumberController::range),
            }
        })
        .collect()
}

fn value_of(v: &SettingView) -> String {
    v.value.as_ref().map(ToString::to_string).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::List => {
            let views = polled(controller);
            let out = output::render_list(&global.output, &views, |v| SettingRow::from(v), value_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Get { key } => {
            let key = util::parse_key(&key)?;
            let range = controller.number(&key).map(vizlo_core::NumberController::range);
            let reading = match controller.snapshot().setting(&key) {
                Some(reading) => reading.clone(),
                // Not polled, or the poll missed it: ask the device.
                None => controller.session().read_setting(&key).await?,
            };
            let view = SettingView::read(key, reading, range);
            let out = output::render_single(&global.output, &view, detail, value_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set { key, value, wait } => {
            let key = util::parse_key(&key)?;
            let receipt = match controller.number(&key) {
                Some(number) => {
                    let numeric: f64 = value.trim().parse().map_err(|_| CliError::Validation {
                        field: key.to_string(),
                        reason: format!("expected a number in {}, got '{value}'", number.range()),
                    })?;
                    number.set_value(numeric).await?
                }
                None => {
                    controller
                        .writer(key.clone())
                        .write(SettingValue::parse_lenient(&value))
                        .await?
                }
            };

            if wait {
                let snap = receipt.refreshed().await;
                let view = SettingView {
                    value: snap.value(&key).cloned(),
                    token: snap.token(&key),
                    range: controller.number(&key).map(vizlo_core::NumberController::range),
                    key,
                };
                let out = output::render_single(&global.output, &view, detail, value_of);
                output::print_output(&out, global.quiet);
            } else if !global.quiet {
                eprintln!("Set {} to {}", receipt.key, receipt.value);
            }
            Ok(())
        }

        SettingsCommand::Dump { category } => {
            let category =
                SettingCategory::from_str(&category).map_err(|_| CliError::Validation {
                    field: "category".into(),
                    reason: format!(
                        "unknown category '{category}' (expected picture, audio, system, or devices)"
                    ),
                })?;
            let views: Vec<SettingView> = controller
                .session()
                .read_category(category)
                .await?
                .into_iter()
                .map(|(key, reading)| SettingView::read(key, reading, None))
                .collect();
            let out = output::render_list(&global.output, &views, |v| SettingRow::from(v), |v| {
                format!("{}={}", v.key, value_of(v))
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn detail(v: &SettingView) -> String {
    let mut lines = vec![
        format!("Setting:  {}", v.key),
        format!(
            "Value:    {}",
            v.value.as_ref().map_or_else(|| "-".into(), ToString::to_string)
        ),
        format!(
            "Token:    {}",
            v.token.map_or_else(|| "-".into(), |t| t.to_string())
        ),
    ];
    if let Some(range) = v.range {
        lines.push(format!("Range:    {range}"));
    }
    lines.join("\n")
}
