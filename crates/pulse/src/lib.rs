//! Pulse - single-target HTTP health monitoring
//!
//! A scheduler probes one URL at a fixed cadence. Every outcome is written to
//! a durable ledger, pushed onto a bounded rolling window and fanned out to
//! live subscribers. The query service reads the ledger back by period.

pub mod config;
pub mod database;
pub mod distributor;
pub mod error;
pub mod history;
pub mod monitoring;
pub mod pool;
pub mod query;
pub mod runtime;

// Re-export main types
pub use config::{Config, ConfigError, StorageBackend};
pub use distributor::{Distributor, SubscriberId, Subscription};
pub use error::{Error, Result};
pub use history::{HistoryStore, Ledger};
pub use monitoring::{
    DownReason, HttpProber, MonitorConfig, MonitorStatus, Outcome, Prober, Scheduler,
    SchedulerHandle, SchedulerState,
};
pub use query::{LatencyPoint, Period, QueryService};
pub use runtime::{Pulse, open_ledger};
