// src/runtime.rs
//! Poll loop that drives a watcher on a fixed cadence.

use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::error::{Result, WatcherError};
use crate::modules::sensor_state::WaterLevelState;
use crate::modules::water_level::WaterLevelWatcher;
use crate::util::http::SensorClient;
use crate::{log_error, log_info};

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub poll_interval: Duration,
}

/// What one poll observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollReport {
    pub state: WaterLevelState,
    pub changed: bool,
    pub outlet: i32,
}

pub struct Runtime<S, C> {
    watcher: Arc<Mutex<WaterLevelWatcher<S, C>>>,
    config: RuntimeConfig,
}

impl<S, C> Runtime<S, C>
where
    S: Send + 'static,
    C: SensorClient + Send + 'static,
{
    pub fn new(watcher: WaterLevelWatcher<S, C>, config: RuntimeConfig) -> Self {
        Self {
            watcher: Arc::new(Mutex::new(watcher)),
            config,
        }
    }

    pub fn watcher(&self) -> Arc<Mutex<WaterLevelWatcher<S, C>>> {
        self.watcher.clone()
    }

    /// Run one `watch` on the blocking pool
    pub async fn poll_once(&self) -> Result<PollReport> {
        let watcher = self.watcher.clone();

        let report = tokio::task::spawn_blocking(move || -> Result<PollReport> {
            let mut watcher = watcher
                .lock()
                .map_err(|_| WatcherError::RuntimeError("watcher lock poisoned".into()))?;
            watcher.watch();

            Ok(PollReport {
                state: watcher.state(),
                changed: watcher.is_water_level_changed(),
                outlet: watcher.outlet(),
            })
        })
        .await
        .map_err(|e| WatcherError::RuntimeError(format!("poll task failed: {}", e)))??;

        Ok(report)
    }

    /// Poll until `shutdown` resolves. Returns the number of polls made.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<u64>
    where
        F: Future<Output = ()>,
    {
        log_info!("Starting poll loop every {:?}", self.config.poll_interval);

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);
        let mut polls = 0u64;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log_info!("Poll loop stopped after {} polls", polls);
                    return Ok(polls);
                }
                _ = interval.tick() => {
                    polls += 1;
                    match self.poll_once().await {
                        Ok(report) if report.changed => {
                            log_info!("Outlet {}: water level changed to {}", report.outlet, report.state);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log_error!("Poll failed: {}", e);
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::http::SensorResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports the ordinal given by the call count: 1, 2, 3, ...
    #[derive(Default)]
    struct CountingClient {
        calls: AtomicUsize,
    }

    impl SensorClient for CountingClient {
        fn get(&self, _url: &str) -> Result<SensorResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(SensorResponse::new(200, format!("{{\"SensorState\": {}}}", n)))
        }
    }

    fn runtime(ready: bool) -> Runtime<(), CountingClient> {
        let mut watcher = WaterLevelWatcher::new((), CountingClient::default());
        if ready {
            watcher.set_power(true);
            watcher.set_url("http://sensor.local/state").unwrap();
            watcher.set_outlet(5);
        }
        Runtime::new(watcher, RuntimeConfig { poll_interval: Duration::from_millis(10) })
    }

    #[tokio::test]
    async fn test_poll_once_reports_change() {
        let runtime = runtime(true);

        let report = runtime.poll_once().await.unwrap();
        assert_eq!(
            report,
            PollReport { state: WaterLevelState::Good, changed: true, outlet: 5 }
        );

        let report = runtime.poll_once().await.unwrap();
        assert_eq!(report.state, WaterLevelState::Flood);
    }

    #[tokio::test]
    async fn test_poll_once_skips_unconfigured_watcher() {
        let runtime = runtime(false);
        let report = runtime.poll_once().await.unwrap();
        assert_eq!(report.state, WaterLevelState::None);
        assert!(!report.changed);
        assert_eq!(report.outlet, -1);

        let watcher = runtime.watcher();
        let calls = watcher.lock().unwrap().client().calls.load(Ordering::SeqCst);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let runtime = runtime(true);
        let polls = runtime
            .run_until(tokio::time::sleep(Duration::from_millis(35)))
            .await
            .unwrap();

        assert!(polls >= 1);
        let watcher = runtime.watcher();
        let calls = watcher.lock().unwrap().client().calls.load(Ordering::SeqCst);
        assert_eq!(calls as u64, polls);
    }
}
