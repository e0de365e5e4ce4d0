// poller.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time,
};
use tracing::{debug, warn};

use super::Device;
use crate::config::PollingSettings;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to the recurring refresh job of one device.
///
/// Dropping the handle ends the job the same way `stop` does.
pub struct Poller {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Runs `device.refresh()` after the initial delay, then waits `interval`
    /// after each refresh completes before the next one.
    pub fn spawn(device: Arc<dyn Device>, polling: PollingSettings) -> Self {
        let (shutdown, mut stopped) = watch::channel(false);
        let interval = polling.interval().max(MIN_INTERVAL);

        let task = tokio::spawn(async move {
            let mut delay = polling.initial_delay();

            loop {
                tokio::select! {
                    _ = time::sleep(delay) => {}
                    _ = stopped.changed() => break,
                }
                if let Err(e) = device.refresh().await {
                    warn!("Refresh failed: {}", e);
                }
                delay = interval;
            }
            debug!("Refresh job stopped");
        });

        Self { shutdown, task }
    }

    /// Stops future refreshes. A refresh already in flight runs to completion.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    pub async fn shutdown(self) {
        self.stop();
        let _ = self.task.await;
    }
}
