use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::{CurrentValue, SetValue, SettingWriter, WriteReceipt};
use crate::error::CoreError;
use crate::model::{PowerMode, PowerState, SettingKey, SettingValue};
use crate::session::DeviceSession;
use crate::store::{RefreshTicket, SettingsCache};

const ECO_MODE_WARNING: &str =
    "Power on disabled: TV in Eco Mode (change to Quick Start in TV settings)";

// ── Mute ─────────────────────────────────────────────────────────

/// `audio/mute` as an on/off switch.
pub struct MuteSwitch {
    writer: SettingWriter,
}

impl MuteSwitch {
    pub fn new(session: Arc<dyn DeviceSession>, cache: Arc<SettingsCache>) -> Self {
        Self {
            writer: SettingWriter::new(SettingKey::audio("mute"), session, cache),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.writer.is_disabled()
    }

    pub async fn turn_on(&self) -> Result<WriteReceipt, CoreError> {
        self.set_value(true).await
    }

    pub async fn turn_off(&self) -> Result<WriteReceipt, CoreError> {
        self.set_value(false).await
    }
}

impl CurrentValue for MuteSwitch {
    type Value = bool;

    fn current_value(&self) -> Option<bool> {
        self.writer
            .current()
            .map(|value| value.as_text().is_some_and(|text| text == "On"))
    }
}

#[async_trait]
impl SetValue for MuteSwitch {
    type Value = bool;

    async fn set_value(&self, on: bool) -> Result<WriteReceipt, CoreError> {
        let value = if on { "On" } else { "Off" };
        self.writer.write(SettingValue::Text(value.into())).await
    }
}

// ── Power ────────────────────────────────────────────────────────

/// What a power request did.
#[derive(Debug, Clone)]
pub enum PowerOutcome {
    /// The key press went out; the ticket tracks the follow-up poll.
    Sent { refresh: RefreshTicket },
    /// Refused locally because the device cannot be woken in this mode.
    Blocked { mode: PowerMode },
}

impl PowerOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

impl fmt::Display for PowerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { .. } => f.write_str("sent"),
            Self::Blocked { mode } => write!(f, "blocked: {mode}"),
        }
    }
}

/// Extra state reported next to the power switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerAttributes {
    pub power_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

pub struct PowerSwitch {
    session: Arc<dyn DeviceSession>,
    cache: Arc<SettingsCache>,
}

impl PowerSwitch {
    pub fn new(session: Arc<dyn DeviceSession>, cache: Arc<SettingsCache>) -> Self {
        Self { session, cache }
    }

    pub fn power_mode(&self) -> Option<PowerMode> {
        self.cache.snapshot().power_mode.clone()
    }

    pub fn is_eco_mode(&self) -> bool {
        self.power_mode().is_some_and(|mode| mode.is_eco())
    }

    pub fn attributes(&self) -> PowerAttributes {
        let mode = self.power_mode();
        let warning = mode
            .as_ref()
            .is_some_and(PowerMode::is_eco)
            .then_some(ECO_MODE_WARNING);
        PowerAttributes {
            power_mode: mode.map(|m| m.to_string()),
            warning,
        }
    }

    /// Wake the device, unless the last poll saw it in Eco mode, in which
    /// case nothing is sent.
    pub async fn turn_on(&self) -> Result<PowerOutcome, CoreError> {
        if let Some(mode) = self.power_mode().filter(PowerMode::is_eco) {
            warn!(%mode, "cannot power on: device is in Eco mode");
            return Ok(PowerOutcome::Blocked { mode });
        }
        self.session.power_on().await?;
        info!("power on sent");
        Ok(PowerOutcome::Sent {
            refresh: self.cache.request_refresh(),
        })
    }

    pub async fn turn_off(&self) -> Result<PowerOutcome, CoreError> {
        self.session.power_off().await?;
        info!("power off sent");
        Ok(PowerOutcome::Sent {
            refresh: self.cache.request_refresh(),
        })
    }
}

impl CurrentValue for PowerSwitch {
    type Value = bool;

    fn current_value(&self) -> Option<bool> {
        self.cache.snapshot().power.map(|power| power == PowerState::On)
    }
}
