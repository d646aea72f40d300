// SmartCast wire types
//
// Every response is wrapped in `{"STATUS": {...}, "ITEMS": [...]}` (or a
// single `"ITEM"` for pairing and app endpoints). Keys are uppercase on the
// wire; lowercase aliases cover firmware that reports them otherwise.

use serde::{Deserialize, Serialize};

/// `STATUS` block present on every response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    #[serde(rename = "RESULT", alias = "result")]
    pub result: String,
    #[serde(rename = "DETAIL", alias = "detail", default)]
    pub detail: Option<String>,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        self.result.eq_ignore_ascii_case("SUCCESS")
    }
}

/// Status-only view, parsed before the typed payload so error responses
/// with unexpected item shapes still surface their result code.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusOnly {
    #[serde(rename = "STATUS", alias = "status")]
    pub status: ResponseStatus,
}

/// Typed envelope. Endpoints populate either `items` or `item`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "ITEMS", alias = "items", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(rename = "ITEM", alias = "item")]
    pub item: Option<T>,
}

/// A single setting as reported by `/menu_native/dynamic/tv_settings/...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingItem {
    /// Mutation token. Must be echoed back on `MODIFY`.
    #[serde(rename = "HASHVAL", alias = "hashval", default)]
    pub hashval: Option<i64>,
    #[serde(rename = "CNAME", alias = "cname", default)]
    pub cname: String,
    #[serde(rename = "NAME", alias = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "TYPE", alias = "type", default)]
    pub item_type: Option<String>,
    /// Integer for sliders, string for list settings, object for inputs.
    #[serde(rename = "VALUE", alias = "value", default)]
    pub value: serde_json::Value,
}

/// An entry of the `devices/name_input` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    #[serde(rename = "CNAME", alias = "cname", default)]
    pub cname: String,
    /// Input name the device accepts in `current_input` writes ("HDMI-1").
    #[serde(rename = "NAME", alias = "name")]
    pub name: String,
    #[serde(rename = "HASHVAL", alias = "hashval", default)]
    pub hashval: Option<i64>,
    #[serde(rename = "VALUE", alias = "value", default)]
    pub value: serde_json::Value,
}

impl InputItem {
    /// User-assigned label ("Apple TV"), when the device reports one.
    pub fn meta_name(&self) -> Option<&str> {
        match &self.value {
            serde_json::Value::Object(map) => map
                .get("NAME")
                .or_else(|| map.get("name"))
                .and_then(serde_json::Value::as_str),
            serde_json::Value::String(s) => Some(s.as_str()),
            _ => None,
        }
        .filter(|s| !s.is_empty())
    }
}

/// `ITEM` returned by `/pairing/start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingChallenge {
    #[serde(rename = "PAIRING_REQ_TOKEN", alias = "pairing_req_token")]
    pub pairing_req_token: i64,
    #[serde(rename = "CHALLENGE_TYPE", alias = "challenge_type")]
    pub challenge_type: i64,
}

/// `ITEM` returned by `/pairing/pair`.
#[derive(Debug, Deserialize)]
pub(crate) struct PairingResult {
    #[serde(rename = "AUTH_TOKEN", alias = "auth_token")]
    pub auth_token: String,
}

/// The launch triple identifying an app on the SmartCast surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLaunchValue {
    #[serde(rename = "APP_ID", alias = "app_id")]
    pub app_id: String,
    #[serde(rename = "NAME_SPACE", alias = "name_space")]
    pub name_space: i64,
    #[serde(rename = "MESSAGE", alias = "message", default)]
    pub message: Option<String>,
}

/// `ITEM` returned by `/app/current`.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentAppItem {
    #[serde(rename = "VALUE", alias = "value", default)]
    pub value: Option<AppLaunchValue>,
}
