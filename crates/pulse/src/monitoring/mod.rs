/// Monitoring engine: probing a target on a schedule.
///
/// - `checker` issues single checks and classifies them
/// - `scheduler` repeats them at a fixed cadence until stopped
/// - `types` holds the immutable `Outcome` record
pub mod checker;
pub mod scheduler;
pub mod types;

pub use checker::{HttpProber, Prober};
pub use scheduler::{MonitorConfig, Scheduler, SchedulerHandle, SchedulerState};
pub use types::{DownReason, LATENCY_SENTINEL, MonitorStatus, Outcome};
