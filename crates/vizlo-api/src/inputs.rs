// Input endpoints

use tracing::debug;

use crate::client::SmartCastClient;
use crate::error::Error;
use crate::models::{InputItem, SettingItem};

const INPUTS_PATH: &str = "/menu_native/dynamic/tv_settings/devices/name_input";
const CURRENT_INPUT_CATEGORY: &str = "devices";
const CURRENT_INPUT_NAME: &str = "current_input";

impl SmartCastClient {
    /// List physical inputs.
    ///
    /// `GET /menu_native/dynamic/tv_settings/devices/name_input`
    pub async fn get_inputs(&self) -> Result<Vec<InputItem>, Error> {
        debug!("listing inputs");
        let envelope = self.get::<InputItem>(INPUTS_PATH).await?;
        Ok(envelope
            .items
            .into_iter()
            .filter(|item| item.cname != CURRENT_INPUT_NAME)
            .collect())
    }

    /// The active input, as a setting item whose value is the input name.
    ///
    /// `GET /menu_native/dynamic/tv_settings/devices/current_input`
    pub async fn get_current_input(&self) -> Result<SettingItem, Error> {
        self.get_setting(CURRENT_INPUT_CATEGORY, CURRENT_INPUT_NAME)
            .await
    }

    /// Switch to the named input.
    ///
    /// Reads the `current_input` hash first, then writes the new name.
    pub async fn set_input(&self, name: &str) -> Result<(), Error> {
        let current = self.get_current_input().await?;
        let hashval = current.hashval.ok_or_else(|| Error::MissingItem {
            path: format!("devices/{CURRENT_INPUT_NAME} (HASHVAL)"),
        })?;
        debug!(input = name, "switching input");
        self.set_setting(
            CURRENT_INPUT_CATEGORY,
            CURRENT_INPUT_NAME,
            hashval,
            &serde_json::Value::String(name.to_owned()),
        )
        .await
    }
}
