//! Background Refresh Task
//!
//! Periodically re-fetches every city held in a client's cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, SharedStore, REFRESH_INTERVAL_SECS};
use crate::fetcher::WeatherFetcher;
use crate::models::WeatherData;

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub failed: usize,
}

// == Refresh Scheduler ==
/// Handle to a running refresh loop.
///
/// The loop ticks immediately, then every `interval`. Stopping is
/// idempotent; dropping the handle also signals the loop to end.
#[derive(Debug)]
pub struct RefreshScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
    grace: Duration,
}

impl RefreshScheduler {
    /// Spawns the refresh loop for `cache` on the current tokio runtime.
    ///
    /// # Arguments
    /// * `cache` - Store shared with the owning client
    /// * `fetcher` - Upstream used to re-fetch each city
    /// * `interval` - Time between cycle starts
    /// * `grace` - How long `stop` waits before aborting the loop
    ///
    /// A zero `interval` cannot drive a ticker and is replaced by the
    /// default refresh period.
    pub fn spawn(
        cache: SharedStore<WeatherData>,
        fetcher: Arc<dyn WeatherFetcher>,
        interval: Duration,
        grace: Duration,
    ) -> Self {
        let interval = if interval.is_zero() {
            warn!(
                "Refresh interval of zero, using {} seconds instead",
                REFRESH_INTERVAL_SECS
            );
            Duration::from_secs(REFRESH_INTERVAL_SECS)
        } else {
            interval
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_refresh_loop(cache, fetcher, interval, shutdown_rx));

        Self {
            shutdown_tx,
            handle: Mutex::new(Some(handle)),
            grace,
        }
    }

    /// Returns true until a stop has been requested or the loop has ended.
    pub fn is_running(&self) -> bool {
        if *self.shutdown_tx.borrow() {
            return false;
        }
        match self.handle.try_lock() {
            Ok(handle) => handle.as_ref().is_some_and(|h| !h.is_finished()),
            // A concurrent stop holds the lock
            Err(_) => false,
        }
    }

    // == Stop ==
    /// Signals the loop to stop and waits for it to finish.
    ///
    /// A cycle in progress finishes its current city first. If the loop has
    /// not ended within the grace period it is aborted. Calling this again
    /// is a no-op.
    pub async fn stop(&self) {
        self.shutdown_tx.send_replace(true);

        let Some(mut handle) = self.handle.lock().await.take() else {
            return;
        };

        match tokio::time::timeout(self.grace, &mut handle).await {
            Ok(Ok(())) => info!("Refresh loop stopped"),
            Ok(Err(err)) => warn!("Refresh loop ended abnormally: {}", err),
            Err(_) => {
                warn!(
                    "Refresh loop did not stop within {:?}, aborting",
                    self.grace
                );
                handle.abort();
            }
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

async fn run_refresh_loop(
    cache: SharedStore<WeatherData>,
    fetcher: Arc<dyn WeatherFetcher>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(
        "Starting refresh loop with interval of {} seconds",
        interval.as_secs_f64()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        if *shutdown_rx.borrow() {
            break;
        }

        let report = refresh_cycle(&cache, fetcher.as_ref(), &shutdown_rx).await;
        if report.failed > 0 {
            info!(
                "Refresh cycle: {} cities refreshed, {} failed",
                report.refreshed, report.failed
            );
        } else {
            debug!("Refresh cycle: {} cities refreshed", report.refreshed);
        }
    }

    debug!("Refresh loop exited");
}

// == Refresh Cycle ==
/// Re-fetches every city present when the cycle starts, one at a time.
///
/// The cache lock is only held to read the snapshot and to commit results,
/// never across a fetch. A failed city keeps its previous entry. A city
/// evicted while its fetch was in flight is not re-inserted.
pub(crate) async fn refresh_cycle(
    cache: &SharedStore<WeatherData>,
    fetcher: &dyn WeatherFetcher,
    shutdown_rx: &watch::Receiver<bool>,
) -> RefreshReport {
    let keys = cache.lock().await.snapshot_keys();
    let mut report = RefreshReport::default();

    for key in keys {
        if *shutdown_rx.borrow() {
            debug!("Stop requested, ending refresh cycle early");
            break;
        }

        let Some(city) = cache.lock().await.original_key_of(&key) else {
            continue;
        };

        match fetcher.fetch(&city).await {
            Ok(data) => {
                let mut store = cache.lock().await;
                if store.contains_key(&key) {
                    store.put(&key, &city, CacheEntry::fetched_now(data));
                    store.stats_mut().record_refresh();
                    report.refreshed += 1;
                }
            }
            Err(err) => {
                warn!(city = %city, error = %err, "Failed to refresh cached city");
                cache.lock().await.stats_mut().record_refresh_failure();
                report.failed += 1;
            }
        }
    }

    report
}
