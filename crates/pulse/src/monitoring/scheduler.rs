use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::checker::Prober;
use crate::distributor::Distributor;
use crate::history::HistoryStore;

/// Default pause between two checks
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Everything one scheduler needs to know about its target
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub name: String,
    pub target: String,
    pub interval: Duration,
}

impl MonitorConfig {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self { name: name.into(), target: target.into(), interval: DEFAULT_INTERVAL }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Lifecycle of a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Drives one prober against one target. Idle until [`Scheduler::start`].
pub struct Scheduler {
    config: MonitorConfig,
    prober: Arc<dyn Prober>,
    history: Arc<HistoryStore>,
    distributor: Distributor,
}

impl Scheduler {
    pub fn new(
        config: MonitorConfig,
        prober: Arc<dyn Prober>,
        history: Arc<HistoryStore>,
        distributor: Distributor,
    ) -> Self {
        Self { config, prober, history, distributor }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState::Idle
    }

    /// Spawn the check loop and hand back its handle
    pub fn start(self) -> SchedulerHandle {
        let (state_tx, state_rx) = watch::channel(SchedulerState::Running);
        let (stop_tx, stop_rx) = watch::channel(false);

        info!(
            monitor = %self.config.name,
            url = %self.config.target,
            interval_secs = self.config.interval.as_secs_f64(),
            "Starting scheduler"
        );

        let task = tokio::spawn(self.run(stop_rx, state_tx));

        SchedulerHandle { stop_tx, state_rx, task }
    }

    async fn run(
        self,
        mut stop_rx: watch::Receiver<bool>,
        state_tx: watch::Sender<SchedulerState>,
    ) {
        let Self { config, prober, history, distributor } = self;

        while !*stop_rx.borrow_and_update() {
            let outcome = Arc::new(prober.check(&config.target).await);

            if let Err(e) = history.append(outcome.clone()).await {
                warn!(monitor = %config.name, "Failed to persist outcome, continuing: {}", e);
            }
            distributor.publish(outcome);

            // Plain sleep: the cadence is not corrected for check duration
            tokio::select! {
                _ = tokio::time::sleep(config.interval) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        // Every handle is gone; nobody can stop us any more
                        info!(monitor = %config.name, "Scheduler handle dropped, stopping");
                    }
                    break;
                }
            }
        }

        state_tx.send_replace(SchedulerState::Stopped);
        info!(monitor = %config.name, "Scheduler stopped");
    }
}

/// A running scheduler
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<SchedulerState>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn state(&self) -> SchedulerState {
        *self.state_rx.borrow()
    }

    /// Observe state transitions
    pub fn state_changes(&self) -> watch::Receiver<SchedulerState> {
        self.state_rx.clone()
    }

    /// Ask the loop to stop without waiting for it
    pub fn request_stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Stop after the in-flight check has been stored and published
    pub async fn stop(self) -> SchedulerState {
        self.request_stop();
        if let Err(e) = self.task.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
        SchedulerState::Stopped
    }
}
