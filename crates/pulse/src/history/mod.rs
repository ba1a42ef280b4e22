//! History store: the durable ledger plus the in-memory rolling window.
//!
//! Two uptime figures come out of here and they are deliberately kept apart:
//! - [`HistoryStore::recent_uptime`] covers the last N outcomes held in the
//!   rolling window (N = window capacity), and is what dashboards display.
//! - [`HistoryStore::uptime_since`] covers every ledger record in a time
//!   window, and is what reports use.

pub mod csv;
pub mod ledger;
pub mod window;

pub use csv::CsvLedger;
pub use ledger::Ledger;
pub use window::{DEFAULT_WINDOW_CAPACITY, RollingWindow};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::monitoring::types::Outcome;

pub struct HistoryStore {
    ledger: Arc<dyn Ledger>,
    window: RwLock<RollingWindow>,
}

impl HistoryStore {
    pub fn new(ledger: Arc<dyn Ledger>, window_capacity: usize) -> Self {
        Self { ledger, window: RwLock::new(RollingWindow::new(window_capacity)) }
    }

    /// Persist the outcome and push it onto the rolling window.
    ///
    /// The window is updated even when the ledger write fails, so live views
    /// stay accurate while durable logging is degraded; the ledger error is
    /// still returned to the caller.
    pub async fn append(&self, outcome: Arc<Outcome>) -> Result<()> {
        let persisted = self.ledger.append(&outcome).await;
        self.window.write().await.push(outcome);
        persisted
    }

    /// Ledger entries with `timestamp >= since`, oldest first
    pub async fn query(&self, since: DateTime<Utc>) -> Result<Vec<Outcome>> {
        self.ledger.since(since).await
    }

    /// Share of UP outcomes in the rolling window, 100 when empty
    pub async fn recent_uptime(&self) -> f64 {
        self.window.read().await.uptime()
    }

    /// Share of UP outcomes in the ledger since `since`, 100 when none
    pub async fn uptime_since(&self, since: DateTime<Utc>) -> Result<f64> {
        let outcomes = self.query(since).await?;
        if outcomes.is_empty() {
            return Ok(100.0);
        }
        let up = outcomes.iter().filter(|o| o.is_up()).count();
        debug!(total = outcomes.len(), up, "Ledger uptime computed");
        Ok(up as f64 / outcomes.len() as f64 * 100.0)
    }

    /// Rolling window contents, oldest first
    pub async fn window_snapshot(&self) -> Vec<Arc<Outcome>> {
        self.window.read().await.snapshot()
    }

    pub async fn window_capacity(&self) -> usize {
        self.window.read().await.capacity()
    }
}
