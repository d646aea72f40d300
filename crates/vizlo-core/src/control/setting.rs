// Token-guarded read-modify-write of one setting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{MutationToken, SettingKey, SettingValue, Snapshot};
use crate::session::DeviceSession;
use crate::store::{RefreshTicket, SettingsCache};

/// Outcome of a successful write: what was written, plus the refresh it
/// triggered.
#[derive(Debug, Clone)]
pub struct WriteReceipt {
    pub key: SettingKey,
    pub value: SettingValue,
    refresh: RefreshTicket,
}

impl WriteReceipt {
    pub fn refresh_ticket(&self) -> &RefreshTicket {
        &self.refresh
    }

    /// Wait for the post-write poll cycle.
    pub async fn refreshed(self) -> Arc<Snapshot> {
        self.refresh.wait().await
    }
}

/// Writes one setting using the token from the latest snapshot.
///
/// A stale token is retried once after a fresh read. If the device reports
/// the setting does not exist, the writer disables itself for good.
pub struct SettingWriter {
    key: SettingKey,
    session: Arc<dyn DeviceSession>,
    cache: Arc<SettingsCache>,
    disabled: AtomicBool,
}

impl SettingWriter {
    pub fn new(key: SettingKey, session: Arc<dyn DeviceSession>, cache: Arc<SettingsCache>) -> Self {
        Self {
            key,
            session,
            cache,
            disabled: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &SettingKey {
        &self.key
    }

    pub fn cache(&self) -> &Arc<SettingsCache> {
        &self.cache
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Value from the latest snapshot.
    pub fn current(&self) -> Option<SettingValue> {
        self.cache.snapshot().value(&self.key).cloned()
    }

    pub async fn write(&self, value: SettingValue) -> Result<WriteReceipt, CoreError> {
        if self.is_disabled() {
            return Err(CoreError::ControllerDisabled {
                key: self.key.to_string(),
            });
        }

        let result = self.read_modify_write(&value).await;
        if let Err(CoreError::SettingNotFound { .. }) = &result {
            warn!(setting = %self.key, "setting not supported by device, disabling controller");
            self.disabled.store(true, Ordering::Relaxed);
        }
        result?;

        info!(setting = %self.key, %value, "setting written");
        Ok(WriteReceipt {
            key: self.key.clone(),
            value,
            refresh: self.cache.request_refresh(),
        })
    }

    async fn read_modify_write(&self, value: &SettingValue) -> Result<(), CoreError> {
        let token = match self.cache.snapshot().token(&self.key) {
            Some(token) => token,
            None => self.fresh_token().await?,
        };

        match self.session.write_setting(&self.key, token, value).await {
            Err(CoreError::Rejected { message }) => {
                debug!(setting = %self.key, %token, detail = %message, "stale token, retrying once");
                let token = self.fresh_token().await?;
                self.session.write_setting(&self.key, token, value).await
            }
            other => other,
        }
    }

    async fn fresh_token(&self) -> Result<MutationToken, CoreError> {
        Ok(self.session.read_setting(&self.key).await?.token)
    }
}
