// Power endpoints
//
// Power state is read from `/state/device/power_mode`; power changes are
// remote-control key presses on codeset 11.

use serde_json::json;
use tracing::debug;

use crate::client::SmartCastClient;
use crate::error::Error;
use crate::models::{Envelope, SettingItem};

const POWER_STATE_PATH: &str = "/state/device/power_mode";
const KEY_COMMAND_PATH: &str = "/key_command/";

const POWER_CODESET: u8 = 11;
const POWER_OFF_CODE: u8 = 0;
const POWER_ON_CODE: u8 = 1;

impl SmartCastClient {
    /// Whether the panel is on.
    ///
    /// `GET /state/device/power_mode`, `ITEMS[0].VALUE` is 1 when on.
    pub async fn get_power_state(&self) -> Result<bool, Error> {
        debug!("reading power state");
        let envelope = self.get::<SettingItem>(POWER_STATE_PATH).await?;
        let item = envelope
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::MissingItem {
                path: POWER_STATE_PATH.into(),
            })?;
        Ok(item.value.as_i64() == Some(1))
    }

    /// Send a single key press.
    ///
    /// `PUT /key_command/` with `{"KEYLIST": [{"CODESET", "CODE", "ACTION"}]}`
    pub async fn key_press(&self, codeset: u8, code: u8) -> Result<(), Error> {
        debug!(codeset, code, "sending key press");
        let body = json!({
            "KEYLIST": [{
                "CODESET": codeset,
                "CODE": code,
                "ACTION": "KEYPRESS",
            }]
        });
        let _: Envelope<serde_json::Value> = self.put(KEY_COMMAND_PATH, &body).await?;
        Ok(())
    }

    /// Power on. Only works while the device's power profile keeps the
    /// network interface awake.
    pub async fn power_on(&self) -> Result<(), Error> {
        self.key_press(POWER_CODESET, POWER_ON_CODE).await
    }

    pub async fn power_off(&self) -> Result<(), Error> {
        self.key_press(POWER_CODESET, POWER_OFF_CODE).await
    }

    /// The power-saving profile ("Eco Mode", "Quick Start").
    ///
    /// `GET /menu_native/dynamic/tv_settings/system/power_mode`
    pub async fn get_power_mode(&self) -> Result<String, Error> {
        let item = self.get_setting("system", "power_mode").await?;
        match item.value {
            serde_json::Value::String(mode) => Ok(mode),
            other => Err(Error::Deserialization {
                message: "power_mode value is not a string".into(),
                body: other.to_string(),
            }),
        }
    }
}
