// ── Poll scheduler ──
//
// Drives the settings cache on a fixed interval. Callers can pull the next
// cycle forward with `request_immediate_refresh()`, which joins a cycle
// already in flight and restarts the interval from now.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::store::{RefreshTicket, SettingsCache};

pub struct PollScheduler {
    cache: Arc<SettingsCache>,
    wake: Arc<Notify>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PollScheduler {
    /// Spawn the poll task. The first scheduled cycle runs one `interval`
    /// from now; callers wanting data immediately refresh the cache first.
    ///
    /// Shares the cache's cancellation token, so [`shutdown`](Self::shutdown)
    /// also abandons a cycle in flight.
    pub fn start(cache: Arc<SettingsCache>, interval: Duration) -> Self {
        let wake = Arc::new(Notify::new());
        let cancel = cache.cancel_token().clone();
        let handle = tokio::spawn(poll_task(
            Arc::clone(&cache),
            interval,
            Arc::clone(&wake),
            cancel.clone(),
        ));
        info!(interval = ?interval, "poll scheduler started");

        Self {
            cache,
            wake,
            cancel,
            handle: Mutex::new(Some(handle)),
        }
    }

    pub fn cache(&self) -> &Arc<SettingsCache> {
        &self.cache
    }

    /// Start a cycle now, or join the one in flight, and push the next
    /// scheduled tick a full interval out.
    pub fn request_immediate_refresh(&self) -> RefreshTicket {
        let ticket = self.cache.request_refresh();
        self.wake.notify_one();
        ticket
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop the task and wait for it to exit. Idempotent.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
            debug!("poll scheduler stopped");
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_task(
    cache: Arc<SettingsCache>,
    interval: Duration,
    wake: Arc<Notify>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = wake.notified() => {
                debug!("immediate refresh requested");
                ticker.reset();
                continue;
            }
            _ = ticker.tick() => {}
        }

        let snapshot = cache.refresh().await;
        if snapshot.failed_reads > 0 {
            debug!(failed_reads = snapshot.failed_reads, "scheduled poll incomplete");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::PollScheduler;
    use crate::test_support::{FakeSession, cache_over};

    #[tokio::test(start_paused = true)]
    async fn polls_on_interval() {
        let fake = Arc::new(FakeSession::standard());
        let cache = cache_over(&fake);
        let scheduler = PollScheduler::start(Arc::clone(&cache), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(25)).await;

        assert_eq!(cache.poll_count(), 2);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_requests_coalesce() {
        let fake = Arc::new(FakeSession::standard());
        let cache = cache_over(&fake);
        let scheduler = PollScheduler::start(Arc::clone(&cache), Duration::from_secs(60));

        let first = scheduler.request_immediate_refresh();
        let second = scheduler.request_immediate_refresh();
        let third = scheduler.request_immediate_refresh();
        assert!(first.same_cycle(&second));
        assert!(first.same_cycle(&third));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(cache.poll_count(), 1);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn request_during_scheduled_cycle_joins_it() {
        let fake = Arc::new(FakeSession::with_read_delay(Duration::from_secs(1)));
        let cache = cache_over(&fake);
        let scheduler = PollScheduler::start(Arc::clone(&cache), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        let in_flight = cache.pending_refresh().unwrap();
        assert_eq!(cache.poll_count(), 1);

        let first = scheduler.request_immediate_refresh();
        let second = scheduler.request_immediate_refresh();
        assert!(first.same_cycle(&in_flight));
        assert!(second.same_cycle(&in_flight));

        first.wait().await;
        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_eq!(cache.poll_count(), 1);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_request_restarts_the_interval() {
        let fake = Arc::new(FakeSession::standard());
        let cache = cache_over(&fake);
        let scheduler = PollScheduler::start(Arc::clone(&cache), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(8)).await;
        scheduler.request_immediate_refresh().wait().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        // 13s in: the request at 8s moved the next tick to 18s.
        assert_eq!(cache.poll_count(), 1);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_polling() {
        let fake = Arc::new(FakeSession::standard());
        let cache = cache_over(&fake);
        let scheduler = PollScheduler::start(Arc::clone(&cache), Duration::from_secs(10));

        scheduler.shutdown().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert!(!scheduler.is_running());
        assert_eq!(cache.poll_count(), 0);
        assert!(cache.cancel_token().is_cancelled());
    }
}
