// App endpoints
//
// Apps are addressed by a launch triple (APP_ID, NAME_SPACE, MESSAGE). The
// device never lists installed apps, so names come from a catalog the
// caller supplies; `default_catalog` covers the common streaming apps.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::SmartCastClient;
use crate::error::Error;
use crate::models::{AppLaunchValue, CurrentAppItem, Envelope};

const CURRENT_APP_PATH: &str = "/app/current";
const LAUNCH_APP_PATH: &str = "/app/launch";

/// A named app and the triple that launches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub name: String,
    pub app_id: String,
    pub name_space: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AppDescriptor {
    pub fn new(name: impl Into<String>, app_id: impl Into<String>, name_space: i64) -> Self {
        Self {
            name: name.into(),
            app_id: app_id.into(),
            name_space,
            message: None,
        }
    }

    pub fn launch_value(&self) -> AppLaunchValue {
        AppLaunchValue {
            app_id: self.app_id.clone(),
            name_space: self.name_space,
            message: self.message.clone(),
        }
    }

    /// Whether a reported running app is this one. `MESSAGE` is only
    /// compared when the catalog entry pins one.
    pub fn matches(&self, running: &AppLaunchValue) -> bool {
        self.app_id == running.app_id
            && self.name_space == running.name_space
            && (self.message.is_none() || self.message == running.message)
    }
}

/// Streaming apps present on most SmartCast firmware.
pub fn default_catalog() -> Vec<AppDescriptor> {
    vec![
        AppDescriptor::new("Netflix", "1", 3),
        AppDescriptor::new("YouTube", "1", 5),
        AppDescriptor::new("Prime Video", "4", 3),
        AppDescriptor::new("Disney+", "75", 4),
    ]
}

/// Find the catalog entry for a running app.
pub fn find_app<'a>(
    catalog: &'a [AppDescriptor],
    running: &AppLaunchValue,
) -> Option<&'a AppDescriptor> {
    catalog.iter().find(|app| app.matches(running))
}

impl SmartCastClient {
    /// The app currently in the foreground, if any.
    ///
    /// `GET /app/current`
    pub async fn get_current_app(&self) -> Result<Option<AppLaunchValue>, Error> {
        debug!("reading current app");
        let envelope = self.get::<CurrentAppItem>(CURRENT_APP_PATH).await?;
        Ok(envelope.item.and_then(|item| item.value))
    }

    /// Launch an app.
    ///
    /// `PUT /app/launch` with `{"VALUE": {APP_ID, NAME_SPACE, MESSAGE}}`
    pub async fn launch_app(&self, app: &AppDescriptor) -> Result<(), Error> {
        debug!(app = %app.name, app_id = %app.app_id, "launching app");
        let body = json!({ "VALUE": app.launch_value() });
        let _: Envelope<serde_json::Value> = self.put(LAUNCH_APP_PATH, &body).await?;
        Ok(())
    }
}
