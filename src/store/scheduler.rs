//! Background auto-refresh

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::hospital::WeakHospitalStore;

/// Owner's handle on the periodic refresh task.
///
/// `stop()` lets an in-flight refresh finish before the task exits. Dropping
/// the handle aborts the task immediately. The task also ends by itself once
/// every `HospitalStore` clone is gone.
pub struct AutoRefreshHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl AutoRefreshHandle {
    pub(crate) fn spawn(store: WeakHospitalStore, period: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            // first refresh one full period after start
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("Auto-refresh shutdown requested");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(live) = store.upgrade() else {
                            debug!("Store dropped, auto-refresh exiting");
                            break;
                        };
                        live.refresh().await;
                    }
                }
            }
        });

        info!(period_secs = period.as_secs(), "Auto-refresh started");

        Self {
            shutdown: Some(shutdown),
            task: Some(task),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    /// Stop the timer and wait for the task to exit
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        info!("Auto-refresh stopped");
    }
}

impl Drop for AutoRefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::events::Change;
    use crate::seed::SeedData;
    use crate::store::HospitalStore;
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;

    fn store(interval_secs: u64) -> HospitalStore {
        let mut config = Config::default();
        config.store.rng_seed = Some(3);
        config.store.refresh_interval_secs = interval_secs;
        HospitalStore::new(SeedData::builtin().unwrap(), &config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_one_period() {
        let store = store(30);
        let mut rx = store.subscribe();
        let handle = store.start_auto_refresh();
        assert!(handle.is_running());
        assert_eq!(handle.period(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        let started = rx.recv().await.unwrap();
        assert_eq!(started.change, Change::RefreshStarted);
        assert!(started.snapshot.loading);

        let finished = rx.recv().await.unwrap();
        assert!(matches!(finished.change, Change::Refreshed { .. }));
        assert!(!finished.snapshot.loading);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_refreshes() {
        let store = store(5);
        let mut rx = store.subscribe();
        let handle = store.start_auto_refresh();

        handle.stop().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(store.telemetry().refreshes_started, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exits_when_store_dropped() {
        let store = store(5);
        let handle = store.start_auto_refresh();
        drop(store);

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert!(!handle.is_running());
    }
}
