// ── Controller facade ──
//
// Wires one device session and one settings cache into the full set of
// controllers, and owns the connect / poll / disconnect lifecycle.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::config::DeviceConfig;
use crate::control::{MuteSwitch, NumberController, PowerSwitch, SettingWriter, SourceController};
use crate::error::CoreError;
use crate::model::{NumberRange, SettingKey, Snapshot};
use crate::scheduler::PollScheduler;
use crate::session::{DeviceSession, SmartCastSession};
use crate::store::{PollPlan, RefreshTicket, SettingsCache};
use crate::stream::SnapshotStream;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. A controller connects
/// once; after [`disconnect()`](Self::disconnect) its cache is shut down
/// and a new controller is needed.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: DeviceConfig,
    session: Arc<dyn DeviceSession>,
    cache: Arc<SettingsCache>,
    scheduler: Mutex<Option<PollScheduler>>,
    connection_state: watch::Sender<ConnectionState>,
    numbers: IndexMap<SettingKey, NumberController>,
    mute: MuteSwitch,
    power: PowerSwitch,
    source: SourceController,
}

impl Controller {
    /// Create a controller talking SmartCast to the configured device.
    /// Does NOT connect.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        let session = SmartCastSession::new(&config)?;
        Ok(Self::with_session(config, Arc::new(session)))
    }

    /// Create a controller over any session implementation.
    pub fn with_session(config: DeviceConfig, session: Arc<dyn DeviceSession>) -> Self {
        let plan = PollPlan::standard(config.include_balance);
        let cache = Arc::new(SettingsCache::new(
            Arc::clone(&session),
            plan.clone(),
            config.timeout,
        ));

        let mute_key = SettingKey::audio("mute");
        let balance_key = SettingKey::audio("balance");
        let numbers = plan
            .settings
            .iter()
            .filter(|key| **key != mute_key)
            .map(|key| {
                let range = if *key == balance_key {
                    NumberRange::BALANCE
                } else {
                    NumberRange::PERCENT
                };
                let controller =
                    NumberController::new(key.clone(), range, Arc::clone(&session), Arc::clone(&cache));
                (key.clone(), controller)
            })
            .collect();

        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(ControllerInner {
                mute: MuteSwitch::new(Arc::clone(&session), Arc::clone(&cache)),
                power: PowerSwitch::new(Arc::clone(&session), Arc::clone(&cache)),
                source: SourceController::new(Arc::clone(&session), Arc::clone(&cache)),
                config,
                session,
                cache,
                scheduler: Mutex::new(None),
                connection_state,
                numbers,
            }),
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<dyn DeviceSession> {
        &self.inner.session
    }

    pub fn cache(&self) -> &Arc<SettingsCache> {
        &self.inner.cache
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the device.
    ///
    /// Probes the device, performs the initial poll, loads the source
    /// options, and starts the scheduler. Auth and configuration errors
    /// fail the connect. A device that is off or unreachable does not: the
    /// first snapshot comes back empty, the source selector reports
    /// `Unavailable`, and the scheduler keeps polling until it answers.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.connect_inner(true).await
    }

    /// Probe, poll once, and load the source options without starting
    /// the scheduler. Any probe failure is returned, since nothing would
    /// poll again.
    pub async fn connect_once(&self) -> Result<(), CoreError> {
        self.connect_inner(false).await
    }

    async fn connect_inner(&self, start_polling: bool) -> Result<(), CoreError> {
        if self.inner.cache.cancel_token().is_cancelled() {
            return Err(CoreError::Unavailable {
                reason: "controller has been disconnected".into(),
            });
        }
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        if let Err(e) = self.inner.session.read_power().await {
            if !(start_polling && e.is_transient()) {
                warn!(error = %e, host = %self.inner.config.host, "device probe failed");
                let _ = self.inner.connection_state.send(ConnectionState::Failed);
                return Err(e);
            }
            warn!(
                error = %e,
                host = %self.inner.config.host,
                "device not answering, polling until it does"
            );
        }

        let snapshot = self.inner.cache.refresh().await;
        debug!(
            settings = snapshot.settings.len(),
            failed_reads = snapshot.failed_reads,
            "initial poll complete"
        );
        self.inner.source.load().await;

        if start_polling {
            let scheduler =
                PollScheduler::start(Arc::clone(&self.inner.cache), self.inner.config.poll_interval);
            *self.inner.scheduler.lock().await = Some(scheduler);
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!(host = %self.inner.config.host, "connected");
        Ok(())
    }

    /// Stop polling and abandon any cycle in flight.
    pub async fn disconnect(&self) {
        if let Some(scheduler) = self.inner.scheduler.lock().await.take() {
            scheduler.shutdown().await;
        }
        self.inner.cache.shutdown();
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    // ── State observation ────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.cache.snapshot()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.cache.subscribe()
    }

    /// Pull the next poll forward, joining the cycle in flight if there is
    /// one. With a scheduler running, its interval restarts from now.
    pub async fn request_immediate_refresh(&self) -> RefreshTicket {
        match self.inner.scheduler.lock().await.as_ref() {
            Some(scheduler) => scheduler.request_immediate_refresh(),
            None => self.inner.cache.request_refresh(),
        }
    }

    // ── Controllers ──────────────────────────────────────────────

    pub fn number(&self, key: &SettingKey) -> Option<&NumberController> {
        self.inner.numbers.get(key)
    }

    pub fn numbers(&self) -> impl Iterator<Item = &NumberController> {
        self.inner.numbers.values()
    }

    pub fn mute(&self) -> &MuteSwitch {
        &self.inner.mute
    }

    pub fn power(&self) -> &PowerSwitch {
        &self.inner.power
    }

    pub fn source(&self) -> &SourceController {
        &self.inner.source
    }

    /// A writer for any setting, including ones outside the poll plan.
    pub fn writer(&self, key: SettingKey) -> SettingWriter {
        SettingWriter::new(key, Arc::clone(&self.inner.session), Arc::clone(&self.inner.cache))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::{ConnectionState, Controller};
    use crate::config::DeviceConfig;
    use crate::control::{CurrentValue, SetValue};
    use crate::error::CoreError;
    use crate::model::{MutationToken, SettingKey, SettingValue};
    use crate::session::DeviceSession;
    use crate::test_support::FakeSession;

    fn config(include_balance: bool) -> DeviceConfig {
        DeviceConfig {
            include_balance,
            ..DeviceConfig::new("192.0.2.10", SecretString::from("tok".to_string()))
        }
    }

    fn controller(fake: &Arc<FakeSession>, include_balance: bool) -> Controller {
        let session: Arc<dyn DeviceSession> = Arc::clone(fake) as Arc<dyn DeviceSession>;
        Controller::with_session(config(include_balance), session)
    }

    #[tokio::test(start_paused = true)]
    async fn connect_polls_and_setting_backlight_writes_known_token() {
        let fake = Arc::new(FakeSession::new());
        fake.set(SettingKey::picture("backlight"), SettingValue::Number(42), 1);
        fake.set(SettingKey::audio("mute"), SettingValue::Text("On".into()), 2);
        fake.set(SettingKey::audio("volume"), SettingValue::Number(20), 3);
        fake.fail(SettingKey::audio("volume"));
        fake.set_sources(&["HDMI-1"], Vec::new());
        let controller = controller(&fake, true);

        controller.connect().await.unwrap();
        assert_eq!(*controller.connection_state().borrow(), ConnectionState::Connected);
        assert!(controller.source().is_available());

        let backlight = controller.number(&SettingKey::picture("backlight")).unwrap();
        assert_eq!(backlight.current_value(), Some(42.0));
        assert_eq!(controller.mute().current_value(), Some(true));
        assert!(controller.snapshot().value(&SettingKey::audio("volume")).is_none());

        let polls = controller.cache().poll_count();
        let receipt = backlight.set_value(50.0).await.unwrap();
        let write = &fake.writes()[0];
        assert_eq!(write.key, SettingKey::picture("backlight"));
        assert_eq!(write.token, MutationToken(1));
        assert_eq!(write.value, SettingValue::Number(50));

        receipt.refreshed().await;
        assert_eq!(controller.cache().poll_count(), polls + 1);
        assert_eq!(backlight.current_value(), Some(50.0));

        controller.disconnect().await;
    }

    #[tokio::test]
    async fn balance_controller_is_optional() {
        let fake = Arc::new(FakeSession::standard());

        let with = controller(&fake, true);
        let without = controller(&fake, false);

        assert_eq!(with.numbers().count(), 8);
        assert_eq!(without.numbers().count(), 7);
        assert!(without.number(&SettingKey::audio("balance")).is_none());
        assert!(with.number(&SettingKey::audio("mute")).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_device_connects_degraded_and_recovers() {
        let fake = Arc::new(FakeSession::standard());
        fake.set_sources(&["HDMI-1"], Vec::new());
        fake.set_unreachable(true);
        let controller = controller(&fake, true);

        controller.connect().await.unwrap();

        assert_eq!(*controller.connection_state().borrow(), ConnectionState::Connected);
        assert!(controller.snapshot().settings.is_empty());
        assert!(!controller.source().is_available());
        assert_eq!(controller.cache().poll_count(), 1);

        fake.set_unreachable(false);
        tokio::time::sleep(controller.config().poll_interval + Duration::from_secs(1)).await;

        assert_eq!(controller.cache().poll_count(), 2);
        assert_eq!(
            controller
                .number(&SettingKey::picture("backlight"))
                .unwrap()
                .current_value(),
            Some(10.0)
        );
        controller.disconnect().await;
    }

    #[tokio::test]
    async fn unreachable_device_fails_one_shot_connect() {
        let fake = Arc::new(FakeSession::standard());
        fake.set_unreachable(true);
        let controller = controller(&fake, true);

        let err = controller.connect_once().await.unwrap_err();

        assert!(err.is_transient(), "got {err:?}");
        assert_eq!(*controller.connection_state().borrow(), ConnectionState::Failed);
        assert_eq!(controller.cache().poll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_refresh_joins_scheduled_cycle() {
        let fake = Arc::new(FakeSession::with_read_delay(Duration::from_secs(1)));
        for key in crate::store::PollPlan::standard(true).settings {
            fake.set(key, SettingValue::Number(10), 1);
        }
        let controller = controller(&fake, true);
        controller.connect().await.unwrap();
        let polls = controller.cache().poll_count();

        // Land inside the first scheduled cycle.
        tokio::time::sleep(controller.config().poll_interval + Duration::from_millis(500)).await;
        let in_flight = controller.cache().pending_refresh().unwrap();
        let ticket = controller.request_immediate_refresh().await;
        assert!(ticket.same_cycle(&in_flight));

        ticket.wait().await;
        assert_eq!(controller.cache().poll_count(), polls + 1);
        controller.disconnect().await;
    }

    #[tokio::test]
    async fn disconnected_controller_cannot_reconnect() {
        let fake = Arc::new(FakeSession::standard());
        let controller = controller(&fake, true);
        controller.connect().await.unwrap();

        controller.disconnect().await;
        let err = controller.connect().await.unwrap_err();

        assert!(matches!(err, CoreError::Unavailable { .. }), "got {err:?}");
        assert_eq!(
            *controller.connection_state().borrow(),
            ConnectionState::Disconnected
        );
    }
}
