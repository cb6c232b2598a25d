//! [`AlertPoller`]: fetch alerts on a fixed interval until stopped.
//!
//! The poll loop runs on its own tokio task and reports each result over an
//! mpsc channel. Stopping the handle (or dropping it) ends the task, so a
//! view that goes away never leaves a timer behind.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::models::{Alert, AlertQuery};
use crate::services::AlertsService;

/// Default refresh interval of the alert view.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One poll outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertFeed {
    Alerts(Vec<Alert>),
    Failed(String),
}

pub struct AlertPoller;

impl AlertPoller {
    /// Start polling. The first fetch happens immediately, then every `every`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        service: Arc<dyn AlertsService>,
        query: AlertQuery,
        every: Duration,
    ) -> (PollerHandle, mpsc::Receiver<AlertFeed>) {
        let (tx, rx) = mpsc::channel(8);
        let cancel = Arc::new(Notify::new());
        let task = tokio::spawn(poll_loop(service, query, every, tx, cancel.clone()));
        (
            PollerHandle {
                cancel,
                task: Some(task),
            },
            rx,
        )
    }
}

async fn poll_loop(
    service: Arc<dyn AlertsService>,
    query: AlertQuery,
    every: Duration,
    tx: mpsc::Sender<AlertFeed>,
    cancel: Arc<Notify>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let update = match service.alerts(&query).await {
                    Ok(alerts) => {
                        debug!(count = alerts.len(), "Alerts polled");
                        AlertFeed::Alerts(alerts)
                    }
                    Err(e) => {
                        warn!(error = %e, "Alert poll failed");
                        AlertFeed::Failed(e.to_string())
                    }
                };
                if tx.send(update).await.is_err() {
                    debug!("Alert feed receiver dropped, stopping poller");
                    break;
                }
            }
            _ = cancel.notified() => {
                debug!("Alert poller stopped");
                break;
            }
        }
    }
}

/// Owner of a running poll task.
pub struct PollerHandle {
    cancel: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop polling and wait for the task to exit.
    pub async fn stop(mut self) {
        // notify_one stores a permit, so a stop issued mid-fetch is not lost.
        self.cancel.notify_one();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Alert poller task ended abnormally");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.cancel.notify_one();
            task.abort();
        }
    }
}
