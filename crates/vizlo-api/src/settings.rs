// Settings endpoints
//
// Category/name keyed read and hash-guarded write of menu settings.

use serde_json::json;
use tracing::debug;

use crate::client::SmartCastClient;
use crate::error::Error;
use crate::models::{Envelope, SettingItem};

/// Root of the dynamic settings tree.
pub const SETTINGS_ROOT: &str = "/menu_native/dynamic/tv_settings";

pub(crate) fn setting_path(category: &str, name: &str) -> String {
    format!("{SETTINGS_ROOT}/{category}/{name}")
}

impl SmartCastClient {
    /// Read one setting with its current hash.
    ///
    /// `GET /menu_native/dynamic/tv_settings/{category}/{name}`
    pub async fn get_setting(&self, category: &str, name: &str) -> Result<SettingItem, Error> {
        let path = setting_path(category, name);
        debug!(category, name, "reading setting");
        let envelope = self.get::<SettingItem>(&path).await?;

        let mut items = envelope.items;
        if items.is_empty() {
            return Err(Error::MissingItem { path });
        }
        // Some firmware returns the whole group; prefer the matching cname.
        let index = items
            .iter()
            .position(|item| item.cname.eq_ignore_ascii_case(name))
            .unwrap_or(0);
        Ok(items.swap_remove(index))
    }

    /// List every setting in a category.
    ///
    /// `GET /menu_native/dynamic/tv_settings/{category}`
    pub async fn list_settings(&self, category: &str) -> Result<Vec<SettingItem>, Error> {
        let path = format!("{SETTINGS_ROOT}/{category}");
        debug!(category, "listing settings");
        Ok(self.get::<SettingItem>(&path).await?.items)
    }

    /// Write a setting, presenting the hash last read for it.
    ///
    /// `PUT /menu_native/dynamic/tv_settings/{category}/{name}` with
    /// `{"REQUEST": "MODIFY", "HASHVAL": h, "VALUE": v}`. A stale hash
    /// comes back as [`Error::HashMismatch`].
    pub async fn set_setting(
        &self,
        category: &str,
        name: &str,
        hashval: i64,
        value: &serde_json::Value,
    ) -> Result<(), Error> {
        let path = setting_path(category, name);
        debug!(category, name, hashval, %value, "writing setting");
        let body = json!({
            "REQUEST": "MODIFY",
            "HASHVAL": hashval,
            "VALUE": value,
        });
        let _: Envelope<serde_json::Value> = self.put(&path, &body).await?;
        Ok(())
    }
}
