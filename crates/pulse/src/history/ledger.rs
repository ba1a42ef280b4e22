use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::monitoring::types::Outcome;

/// Durable, append-only record of every outcome.
///
/// Implementations must make each `append` atomic with respect to earlier
/// records: an interrupted write may lose the record being written, never the
/// ones before it.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Persist one outcome
    async fn append(&self, outcome: &Outcome) -> Result<()>;

    /// All outcomes with `timestamp >= since`, oldest first
    async fn since(&self, since: DateTime<Utc>) -> Result<Vec<Outcome>>;
}
