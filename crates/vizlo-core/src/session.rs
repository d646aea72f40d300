// ── Device session ──
//
// The single seam between the core and the network. Everything above this
// trait (cache, scheduler, controllers) is written against
// `Arc<dyn DeviceSession>` so it can run against an in-memory fake.

use async_trait::async_trait;
use tracing::debug;
use vizlo_api::{AppDescriptor, SmartCastClient};

use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{
    MutationToken, PowerMode, PowerState, SettingCategory, SettingKey, SettingReading,
    SettingValue, SourceList,
};

/// Input names under which the device reports its built-in app surface.
const APP_SURFACE_INPUTS: [&str; 2] = ["CAST", "SMARTCAST"];

/// Request/response access to one television.
///
/// Implementations hold no state between calls beyond their network
/// identity, and never retry.
#[async_trait]
pub trait DeviceSession: Send + Sync {
    /// Read a setting and the token guarding its next write.
    async fn read_setting(&self, key: &SettingKey) -> Result<SettingReading, CoreError>;

    /// Write a setting. A stale `token` yields [`CoreError::Rejected`].
    async fn write_setting(
        &self,
        key: &SettingKey,
        token: MutationToken,
        value: &SettingValue,
    ) -> Result<(), CoreError>;

    /// Every setting the device exposes in a category. Entries without a
    /// writable scalar value are skipped.
    async fn read_category(
        &self,
        category: SettingCategory,
    ) -> Result<Vec<(SettingKey, SettingReading)>, CoreError> {
        Err(CoreError::Unavailable {
            reason: format!("listing {category} settings is not supported by this session"),
        })
    }

    async fn read_inputs(&self) -> Result<Vec<String>, CoreError>;

    async fn read_apps(&self) -> Result<Vec<AppDescriptor>, CoreError>;

    async fn read_source_list(&self) -> Result<SourceList, CoreError> {
        let inputs = self.read_inputs().await?;
        let apps = self.read_apps().await?;
        Ok(SourceList { inputs, apps })
    }

    /// Name of the active input, or of the running app when the app
    /// surface is in front.
    async fn read_current_source(&self) -> Result<Option<String>, CoreError>;

    async fn read_power(&self) -> Result<PowerState, CoreError>;

    async fn read_power_mode(&self) -> Result<PowerMode, CoreError>;

    async fn activate_input(&self, name: &str) -> Result<(), CoreError>;

    async fn launch_app(&self, app: &AppDescriptor) -> Result<(), CoreError>;

    async fn power_on(&self) -> Result<(), CoreError>;

    async fn power_off(&self) -> Result<(), CoreError>;
}

// ── SmartCast implementation ─────────────────────────────────────────

/// [`DeviceSession`] over the SmartCast REST API.
pub struct SmartCastSession {
    client: SmartCastClient,
    apps: Vec<AppDescriptor>,
}

impl SmartCastSession {
    /// Build an authenticated session from a validated config.
    pub fn new(config: &DeviceConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = SmartCastClient::new(
            &config.host,
            config.port,
            Some(&config.auth_token),
            &config.transport(),
        )?;
        Ok(Self::with_client(client, config.apps.clone()))
    }

    pub fn with_client(client: SmartCastClient, apps: Vec<AppDescriptor>) -> Self {
        Self { client, apps }
    }

    pub fn client(&self) -> &SmartCastClient {
        &self.client
    }
}

/// Attach the setting key to not-found errors; the wire error only knows
/// the URL path.
fn for_setting(key: &SettingKey, err: vizlo_api::Error) -> CoreError {
    if err.is_not_found() {
        CoreError::SettingNotFound {
            key: key.to_string(),
        }
    } else {
        err.into()
    }
}

#[async_trait]
impl DeviceSession for SmartCastSession {
    async fn read_setting(&self, key: &SettingKey) -> Result<SettingReading, CoreError> {
        let item = self
            .client
            .get_setting(key.category.as_ref(), &key.name)
            .await
            .map_err(|e| for_setting(key, e))?;

        let value = SettingValue::from_json(&item.value).ok_or_else(|| CoreError::Api {
            message: format!("{key} has unsupported value {}", item.value),
            code: None,
        })?;
        let token = item.hashval.map(MutationToken).ok_or_else(|| CoreError::Api {
            message: format!("{key} was reported without a HASHVAL"),
            code: None,
        })?;
        Ok(SettingReading { value, token })
    }

    async fn write_setting(
        &self,
        key: &SettingKey,
        token: MutationToken,
        value: &SettingValue,
    ) -> Result<(), CoreError> {
        self.client
            .set_setting(key.category.as_ref(), &key.name, token.0, &value.to_json())
            .await
            .map_err(|e| for_setting(key, e))
    }

    async fn read_category(
        &self,
        category: SettingCategory,
    ) -> Result<Vec<(SettingKey, SettingReading)>, CoreError> {
        let items = self.client.list_settings(category.as_ref()).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let value = SettingValue::from_json(&item.value)?;
                let token = MutationToken(item.hashval?);
                Some((
                    SettingKey::new(category, item.cname),
                    SettingReading { value, token },
                ))
            })
            .collect())
    }

    async fn read_inputs(&self) -> Result<Vec<String>, CoreError> {
        let inputs = self.client.get_inputs().await?;
        Ok(inputs.into_iter().map(|input| input.name).collect())
    }

    async fn read_apps(&self) -> Result<Vec<AppDescriptor>, CoreError> {
        Ok(self.apps.clone())
    }

    async fn read_current_source(&self) -> Result<Option<String>, CoreError> {
        let item = self.client.get_current_input().await?;
        let Some(input) = item.value.as_str().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        if !APP_SURFACE_INPUTS
            .iter()
            .any(|surface| input.eq_ignore_ascii_case(surface))
        {
            return Ok(Some(input.to_owned()));
        }

        let running = self.client.get_current_app().await?;
        let app = running
            .as_ref()
            .and_then(|running| vizlo_api::find_app(&self.apps, running));
        debug!(input, app = ?app.map(|a| a.name.as_str()), "app surface active");
        Ok(Some(app.map_or_else(|| input.to_owned(), |a| a.name.clone())))
    }

    async fn read_power(&self) -> Result<PowerState, CoreError> {
        Ok(PowerState::from(self.client.get_power_state().await?))
    }

    async fn read_power_mode(&self) -> Result<PowerMode, CoreError> {
        Ok(PowerMode::new(self.client.get_power_mode().await?))
    }

    async fn activate_input(&self, name: &str) -> Result<(), CoreError> {
        Ok(self.client.set_input(name).await?)
    }

    async fn launch_app(&self, app: &AppDescriptor) -> Result<(), CoreError> {
        Ok(self.client.launch_app(app).await?)
    }

    async fn power_on(&self) -> Result<(), CoreError> {
        Ok(self.client.power_on().await?)
    }

    async fn power_off(&self) -> Result<(), CoreError> {
        Ok(self.client.power_off().await?)
    }
}
