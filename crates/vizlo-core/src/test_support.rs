// In-memory device session for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vizlo_api::AppDescriptor;

use crate::error::CoreError;
use crate::model::{
    MutationToken, PowerMode, PowerState, SettingKey, SettingReading, SettingValue,
};
use crate::session::DeviceSession;
use crate::store::{PollPlan, SettingsCache};

/// A recorded `write_setting` attempt, accepted or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WriteAttempt {
    pub key: SettingKey,
    pub token: MutationToken,
    pub value: SettingValue,
    pub accepted: bool,
}

#[derive(Default)]
struct FakeState {
    settings: HashMap<SettingKey, SettingReading>,
    failing: HashSet<SettingKey>,
    hanging: HashSet<SettingKey>,
    forced_rejections: usize,
    unreachable: bool,
    inputs: Vec<String>,
    apps: Vec<AppDescriptor>,
    current_source: Option<String>,
    power: Option<PowerState>,
    power_mode: Option<PowerMode>,
    writes: Vec<WriteAttempt>,
    activated: Vec<String>,
    launched: Vec<String>,
    calls: HashMap<String, usize>,
}

/// Behaves like a device: writes must present the current token, accepted
/// writes bump it. Reads can be made to fail, hang, or take a while.
pub(crate) struct FakeSession {
    state: Mutex<FakeState>,
    read_delay: Duration,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::with_read_delay(Duration::ZERO)
    }

    pub fn with_read_delay(read_delay: Duration) -> Self {
        Self {
            state: Mutex::new(FakeState {
                power: Some(PowerState::On),
                power_mode: Some(PowerMode::new("Quick Start")),
                ..FakeState::default()
            }),
            read_delay,
        }
    }

    /// Every setting of the standard plan, valued 10 with token 100+i.
    pub fn standard() -> Self {
        let fake = Self::new();
        for (i, key) in (0_i64..).zip(PollPlan::standard(true).settings) {
            let value = if key.name == "mute" {
                SettingValue::Text("Off".into())
            } else {
                SettingValue::Number(10)
            };
            fake.set(key, value, 100 + i);
        }
        fake
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    // ── Arrangement ──────────────────────────────────────────────

    pub fn set(&self, key: SettingKey, value: SettingValue, token: i64) {
        self.state().settings.insert(
            key,
            SettingReading {
                value,
                token: MutationToken(token),
            },
        );
    }

    /// Simulate another client changing the setting: new token, same value.
    pub fn bump_token(&self, key: &SettingKey, token: i64) {
        if let Some(reading) = self.state().settings.get_mut(key) {
            reading.token = MutationToken(token);
        }
    }

    pub fn fail(&self, key: SettingKey) {
        self.state().failing.insert(key);
    }

    pub fn hang(&self, key: SettingKey) {
        self.state().hanging.insert(key);
    }

    pub fn reject_next_writes(&self, count: usize) {
        self.state().forced_rejections = count;
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    pub fn set_sources(&self, inputs: &[&str], apps: Vec<AppDescriptor>) {
        let mut state = self.state();
        state.inputs = inputs.iter().map(|s| (*s).to_owned()).collect();
        state.apps = apps;
    }

    pub fn set_current_source(&self, source: &str) {
        self.state().current_source = Some(source.to_owned());
    }

    pub fn set_power_mode(&self, mode: &str) {
        self.state().power_mode = Some(PowerMode::new(mode));
    }

    // ── Inspection ───────────────────────────────────────────────

    pub fn calls(&self, op: &str) -> usize {
        self.state().calls.get(op).copied().unwrap_or(0)
    }

    pub fn reads_of(&self, key: &SettingKey) -> usize {
        self.calls(&format!("read_setting:{key}"))
    }

    pub fn writes(&self) -> Vec<WriteAttempt> {
        self.state().writes.clone()
    }

    pub fn activated(&self) -> Vec<String> {
        self.state().activated.clone()
    }

    pub fn launched(&self) -> Vec<String> {
        self.state().launched.clone()
    }

    // ── Internals ────────────────────────────────────────────────

    fn record(&self, op: &str) -> Result<(), CoreError> {
        let mut state = self.state();
        *state.calls.entry(op.to_owned()).or_default() += 1;
        if state.unreachable {
            return Err(unreachable());
        }
        Ok(())
    }

    async fn delay(&self) {
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
    }
}

fn unreachable() -> CoreError {
    CoreError::Unreachable {
        host: "fake-tv".into(),
        reason: "connection refused".into(),
    }
}

#[async_trait]
impl DeviceSession for FakeSession {
    async fn read_setting(&self, key: &SettingKey) -> Result<SettingReading, CoreError> {
        self.record(&format!("read_setting:{key}"))?;
        let hang = self.state().hanging.contains(key);
        if hang {
            std::future::pending::<()>().await;
        }
        self.delay().await;

        let state = self.state();
        if state.failing.contains(key) {
            return Err(unreachable());
        }
        state
            .settings
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::SettingNotFound {
                key: key.to_string(),
            })
    }

    async fn write_setting(
        &self,
        key: &SettingKey,
        token: MutationToken,
        value: &SettingValue,
    ) -> Result<(), CoreError> {
        self.record("write_setting")?;
        let mut state = self.state();
        let Some(current) = state.settings.get(key).map(|r| r.token) else {
            return Err(CoreError::SettingNotFound {
                key: key.to_string(),
            });
        };

        let accepted = if state.forced_rejections > 0 {
            state.forced_rejections -= 1;
            false
        } else {
            current == token
        };
        state.writes.push(WriteAttempt {
            key: key.clone(),
            token,
            value: value.clone(),
            accepted,
        });
        if !accepted {
            return Err(CoreError::Rejected {
                message: format!("stale hash value for {key}"),
            });
        }

        state.settings.insert(
            key.clone(),
            SettingReading {
                value: value.clone(),
                token: MutationToken(current.0 + 1),
            },
        );
        Ok(())
    }

    async fn read_inputs(&self) -> Result<Vec<String>, CoreError> {
        self.record("read_inputs")?;
        Ok(self.state().inputs.clone())
    }

    async fn read_apps(&self) -> Result<Vec<AppDescriptor>, CoreError> {
        self.record("read_apps")?;
        Ok(self.state().apps.clone())
    }

    async fn read_current_source(&self) -> Result<Option<String>, CoreError> {
        self.record("read_current_source")?;
        self.delay().await;
        Ok(self.state().current_source.clone())
    }

    async fn read_power(&self) -> Result<PowerState, CoreError> {
        self.record("read_power")?;
        self.delay().await;
        self.state().power.ok_or_else(unreachable)
    }

    async fn read_power_mode(&self) -> Result<PowerMode, CoreError> {
        self.record("read_power_mode")?;
        self.delay().await;
        self.state().power_mode.clone().ok_or_else(unreachable)
    }

    async fn activate_input(&self, name: &str) -> Result<(), CoreError> {
        self.record("activate_input")?;
        let mut state = self.state();
        state.activated.push(name.to_owned());
        state.current_source = Some(name.to_owned());
        Ok(())
    }

    async fn launch_app(&self, app: &AppDescriptor) -> Result<(), CoreError> {
        self.record("launch_app")?;
        let mut state = self.state();
        state.launched.push(app.name.clone());
        state.current_source = Some(app.name.clone());
        Ok(())
    }

    async fn power_on(&self) -> Result<(), CoreError> {
        self.record("power_on")?;
        self.state().power = Some(PowerState::On);
        Ok(())
    }

    async fn power_off(&self) -> Result<(), CoreError> {
        self.record("power_off")?;
        self.state().power = Some(PowerState::Off);
        Ok(())
    }
}

/// A cache over `fake` with the standard plan and a 5 s read timeout.
pub(crate) fn cache_over(fake: &Arc<FakeSession>) -> Arc<SettingsCache> {
    let session: Arc<dyn DeviceSession> = Arc::clone(fake) as Arc<dyn DeviceSession>;
    Arc::new(SettingsCache::new(
        session,
        PollPlan::standard(true),
        Duration::from_secs(5),
    ))
}
