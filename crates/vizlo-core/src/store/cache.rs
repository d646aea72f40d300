// Settings cache
//
// Owns the published `Arc<Snapshot>` and runs poll cycles. A cycle reads
// everything in the plan concurrently, each read bounded by the request
// timeout, and publishes one new snapshot. Refresh requests arriving while
// a cycle is in flight join that cycle instead of starting another.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt, Shared, join_all};
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::PollPlan;
use crate::error::CoreError;
use crate::model::{SettingKey, SettingReading, Snapshot};
use crate::session::DeviceSession;
use crate::stream::SnapshotStream;

// ── RefreshTicket ────────────────────────────────────────────────

/// Handle on one poll cycle. Cloneable; every clone resolves to the same
/// snapshot.
///
/// The cycle runs on its own task, so dropping the ticket does not cancel
/// it. If the cycle is abandoned (cache shut down) the ticket resolves to
/// the last published snapshot.
#[derive(Clone)]
pub struct RefreshTicket {
    inner: Shared<BoxFuture<'static, Arc<Snapshot>>>,
}

impl RefreshTicket {
    fn new(done: oneshot::Receiver<Arc<Snapshot>>, latest: watch::Receiver<Arc<Snapshot>>) -> Self {
        let fut = async move {
            match done.await {
                Ok(snapshot) => snapshot,
                Err(_) => latest.borrow().clone(),
            }
        };
        Self {
            inner: fut.boxed().shared(),
        }
    }

    /// Wait for the cycle to publish.
    pub async fn wait(self) -> Arc<Snapshot> {
        self.inner.await
    }

    /// Whether two tickets belong to the same cycle.
    pub fn same_cycle(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl fmt::Debug for RefreshTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTicket").finish_non_exhaustive()
    }
}

// ── SettingsCache ────────────────────────────────────────────────

pub struct SettingsCache {
    session: Arc<dyn DeviceSession>,
    plan: PollPlan,
    read_timeout: Duration,
    snapshot: watch::Sender<Arc<Snapshot>>,
    inflight: Mutex<Option<RefreshTicket>>,
    cancel: CancellationToken,
    cycles: AtomicU64,
}

impl SettingsCache {
    pub fn new(session: Arc<dyn DeviceSession>, plan: PollPlan, read_timeout: Duration) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            session,
            plan,
            read_timeout,
            snapshot,
            inflight: Mutex::new(None),
            cancel: CancellationToken::new(),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &Arc<dyn DeviceSession> {
        &self.session
    }

    pub fn plan(&self) -> &PollPlan {
        &self.plan
    }

    /// The latest published snapshot (empty before the first cycle).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    /// Number of poll cycles started so far.
    pub fn poll_count(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Token that abandons in-flight cycles and refuses new ones.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Run (or join) a poll cycle and wait for its snapshot.
    pub async fn refresh(self: &Arc<Self>) -> Arc<Snapshot> {
        self.request_refresh().wait().await
    }

    /// Start a poll cycle, or join the one already in flight.
    ///
    /// Must be called from within a Tokio runtime: the first requester
    /// spawns the task that drives the cycle.
    pub fn request_refresh(self: &Arc<Self>) -> RefreshTicket {
        let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ticket) = slot.as_ref() {
            debug!("joining in-flight poll cycle");
            return ticket.clone();
        }

        let (done_tx, done_rx) = oneshot::channel();
        let ticket = RefreshTicket::new(done_rx, self.snapshot.subscribe());
        if self.cancel.is_cancelled() {
            // Sender dropped: the ticket resolves to the current snapshot.
            return ticket;
        }

        *slot = Some(ticket.clone());
        drop(slot);

        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let snapshot = cache.run_cycle().await;
            cache
                .inflight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            let _ = done_tx.send(snapshot);
        });

        ticket
    }

    /// The in-flight cycle, if one is running.
    pub fn pending_refresh(&self) -> Option<RefreshTicket> {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Poll cycle ───────────────────────────────────────────────

    async fn run_cycle(&self) -> Arc<Snapshot> {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let started = tokio::time::Instant::now();

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!(cycle, "poll cycle abandoned");
                self.snapshot()
            }
            snapshot = self.poll() => {
                debug!(
                    cycle,
                    settings = snapshot.settings.len(),
                    failed_reads = snapshot.failed_reads,
                    elapsed = ?started.elapsed(),
                    "poll cycle complete"
                );
                let snapshot = Arc::new(snapshot);
                self.snapshot.send_replace(Arc::clone(&snapshot));
                snapshot
            }
        }
    }

    async fn poll(&self) -> Snapshot {
        let session = self.session.as_ref();
        let plan = &self.plan;

        let settings = join_all(plan.settings.iter().map(|key| self.read_setting(key)));
        let current_source = async {
            if plan.current_source {
                PlannedRead::from(self.bounded("current source", session.read_current_source()).await)
            } else {
                PlannedRead::Skipped
            }
        };
        let power = async {
            if plan.power {
                PlannedRead::from(self.bounded("power state", session.read_power()).await)
            } else {
                PlannedRead::Skipped
            }
        };
        let power_mode = async {
            if plan.power_mode {
                PlannedRead::from(self.bounded("power mode", session.read_power_mode()).await)
            } else {
                PlannedRead::Skipped
            }
        };

        let (settings, current_source, power, power_mode) =
            tokio::join!(settings, current_source, power, power_mode);

        let mut snapshot = Snapshot {
            taken_at: Some(Utc::now()),
            ..Snapshot::default()
        };
        for (key, reading) in settings {
            match reading {
                Some(reading) => {
                    snapshot.settings.insert(key.clone(), reading);
                }
                None => snapshot.failed_reads += 1,
            }
        }
        snapshot.current_source = current_source
            .take(&mut snapshot.failed_reads)
            .flatten();
        snapshot.power = power.take(&mut snapshot.failed_reads);
        snapshot.power_mode = power_mode.take(&mut snapshot.failed_reads);
        snapshot
    }

    async fn read_setting<'a>(
        &self,
        key: &'a SettingKey,
    ) -> (&'a SettingKey, Option<SettingReading>) {
        let reading = self.bounded(key, self.session.read_setting(key)).await;
        (key, reading)
    }

    /// Run one read under the request timeout. Failures are logged and
    /// swallowed; the caller only sees whether a value arrived.
    async fn bounded<T>(
        &self,
        what: impl Display,
        read: impl Future<Output = Result<T, CoreError>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.read_timeout, read).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!(read = %what, error = %e, "poll read failed");
                None
            }
            Err(_) => {
                debug!(read = %what, timeout = ?self.read_timeout, "poll read timed out");
                None
            }
        }
    }
}

/// Outcome of an optional read in the plan.
enum PlannedRead<T> {
    Skipped,
    Failed,
    Done(T),
}

impl<T> From<Option<T>> for PlannedRead<T> {
    fn from(read: Option<T>) -> Self {
        read.map_or(Self::Failed, Self::Done)
    }
}

impl<T> PlannedRead<T> {
    fn take(self, failed_reads: &mut usize) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Failed => {
                *failed_reads += 1;
                None
            }
            Self::Skipped => None,
        }
    }
}
