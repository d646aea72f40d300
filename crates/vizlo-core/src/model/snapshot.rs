use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{MutationToken, PowerMode, PowerState, SettingKey, SettingReading, SettingValue};

/// Everything one poll cycle learned about the device.
///
/// Built in full by a single cycle and published as `Arc<Snapshot>`; a
/// published snapshot is never mutated. Settings whose read failed are
/// absent from `settings` rather than carrying a stale value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Successful reads, in poll order.
    pub settings: IndexMap<SettingKey, SettingReading>,
    pub current_source: Option<String>,
    pub power: Option<PowerState>,
    pub power_mode: Option<PowerMode>,
    /// `None` until the first cycle completes.
    pub taken_at: Option<DateTime<Utc>>,
    pub failed_reads: usize,
}

impl Snapshot {
    pub fn setting(&self, key: &SettingKey) -> Option<&SettingReading> {
        self.settings.get(key)
    }

    pub fn value(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.settings.get(key).map(|reading| &reading.value)
    }

    pub fn token(&self, key: &SettingKey) -> Option<MutationToken> {
        self.settings.get(key).map(|reading| reading.token)
    }

    /// Whether a poll cycle has ever been published.
    pub fn is_initial(&self) -> bool {
        self.taken_at.is_none()
    }
}
