//! Read-only access to the ledger through named time windows.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::history::HistoryStore;

/// Named query window. Unknown tokens fall back to [`Period::Last12Hours`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Since local midnight
    Today,
    #[default]
    Last12Hours,
    Last24Hours,
}

impl Period {
    /// Accepts `today`/`tdy`, `12h` and `24h` in any case
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "today" | "tdy" => Period::Today,
            "24h" => Period::Last24Hours,
            _ => Period::Last12Hours,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Last12Hours => "12h",
            Period::Last24Hours => "24h",
        }
    }

    /// Start of the window ending at `now`, in the timezone of `now`
    pub fn since<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Utc> {
        let now_utc = now.with_timezone(&Utc);
        match self {
            Period::Last12Hours => now_utc - Duration::hours(12),
            Period::Last24Hours => now_utc - Duration::hours(24),
            Period::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| midnight.and_local_timezone(now.timezone()).earliest())
                .map(|midnight| midnight.with_timezone(&Utc))
                // Midnight skipped by a DST change
                .unwrap_or_else(|| Period::Last12Hours.since(now)),
        }
    }
}

/// One point of the latency history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyPoint {
    pub timestamp: DateTime<Utc>,
    pub latency: i64,
}

/// Thin read path over [`HistoryStore::query`]
#[derive(Clone)]
pub struct QueryService {
    history: Arc<HistoryStore>,
}

impl QueryService {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    /// Latency history for a period token, relative to the local clock
    pub async fn query(&self, token: &str) -> Result<Vec<LatencyPoint>> {
        self.history_at(Period::parse(token), &Local::now()).await
    }

    /// Latency history for `period` ending at `now`, oldest first
    pub async fn history_at<Tz: TimeZone>(
        &self,
        period: Period,
        now: &DateTime<Tz>,
    ) -> Result<Vec<LatencyPoint>> {
        let since = period.since(now);
        let outcomes = self.history.query(since).await?;

        Ok(outcomes
            .into_iter()
            .map(|o| LatencyPoint { timestamp: o.timestamp(), latency: o.latency_ms() })
            .collect())
    }

    /// Ledger uptime over `period`; see [`HistoryStore::uptime_since`]
    pub async fn uptime(&self, period: Period) -> Result<f64> {
        self.history.uptime_since(period.since(&Local::now())).await
    }
}
