use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::params;

use crate::error::{Error, Result};
use crate::history::Ledger;
use crate::monitoring::types::{DownReason, Outcome};
use crate::pool::{LibsqlManager, LibsqlPool};

/// libsql implementation of [`Ledger`], scoped to one monitor
pub struct LibsqlLedger {
    pool: LibsqlPool,
    monitor: String,
}

impl LibsqlLedger {
    /// Create a ledger over an initialized pool
    pub fn new_from_pool(pool: LibsqlPool, monitor: impl Into<String>) -> Self {
        Self { pool, monitor: monitor.into() }
    }

    /// Open the database file, run migrations and scope to `monitor`
    pub async fn open(path: &str, monitor: impl Into<String>) -> Result<Self> {
        let pool = crate::pool::open_pool(path).await?;
        let conn = pool.get().await?;
        super::initialize_database(&conn).await?;
        drop(conn);
        Ok(Self::new_from_pool(pool, monitor))
    }

    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl Ledger for LibsqlLedger {
    async fn append(&self, outcome: &Outcome) -> Result<()> {
        let conn = self.get_conn().await?;

        conn.execute(
            "INSERT INTO outcomes \
             (monitor, timestamp_ms, status, reason, latency_ms, status_code, error_message) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                self.monitor.clone(),
                outcome.timestamp().timestamp_millis(),
                outcome.status().to_string(),
                outcome.reason().map(|r| r.as_str().to_string()),
                outcome.latency_ms(),
                outcome.status_code().map(|v| v as i64),
                outcome.error().map(str::to_string)
            ],
        )
        .await?;

        Ok(())
    }

    async fn since(&self, since: DateTime<Utc>) -> Result<Vec<Outcome>> {
        let conn = self.get_conn().await?;
        let mut stmt = conn
            .prepare(
                "SELECT timestamp_ms, reason, latency_ms, status_code, error_message \
                 FROM outcomes WHERE monitor = ? AND timestamp_ms >= ? \
                 ORDER BY timestamp_ms ASC, id ASC",
            )
            .await?;

        // Rows are stored at millisecond precision, so round a finer bound up
        let since_ms = since.timestamp_millis()
            + i64::from(since.timestamp_subsec_nanos() % 1_000_000 != 0);
        let mut rows = stmt.query(params![self.monitor.clone(), since_ms]).await?;
        let mut outcomes = Vec::new();

        while let Some(row) = rows.next().await? {
            let timestamp_ms: i64 = row.get(0)?;
            let reason: Option<String> = row.get(1)?;
            let latency_ms: i64 = row.get(2)?;
            let status_code: Option<i64> = row.get(3)?;
            let error_message: Option<String> = row.get(4)?;

            let timestamp = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
                Error::InvalidRecord(format!("timestamp out of range: {timestamp_ms}"))
            })?;

            let outcome = match status_code {
                Some(code) => {
                    let code = u16::try_from(code).map_err(|_| {
                        Error::InvalidRecord(format!("status code out of range: {code}"))
                    })?;
                    Outcome::from_response_ms(code, latency_ms, timestamp)
                }
                None => {
                    let reason = match reason.as_deref() {
                        Some("timeout") => DownReason::Timeout,
                        _ => DownReason::ConnectionError,
                    };
                    Outcome::from_transport_failure(reason, error_message, timestamp)
                }
            };

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;
    use tempfile::tempdir;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    async fn open_ledger(dir: &tempfile::TempDir, monitor: &str) -> LibsqlLedger {
        let path = dir.path().join("pulse.db");
        LibsqlLedger::open(path.to_string_lossy().as_ref(), monitor).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_ledger_yields_empty_sequence() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir, "portal").await;

        assert!(ledger.since(at(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outcomes_round_trip_through_rows() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir, "portal").await;

        let written = vec![
            Outcome::from_response(200, Duration::from_millis(120), at(0)),
            Outcome::from_response(502, Duration::from_millis(30), at(5)),
            Outcome::from_transport_failure(DownReason::Timeout, Some("timed out".into()), at(10)),
            Outcome::from_transport_failure(DownReason::ConnectionError, None, at(15)),
        ];
        for outcome in &written {
            ledger.append(outcome).await.unwrap();
        }

        assert_eq!(ledger.since(at(0)).await.unwrap(), written);
    }

    #[tokio::test]
    async fn test_since_excludes_older_and_future_is_empty() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir, "portal").await;
        for i in 0..6 {
            let outcome = Outcome::from_response(200, Duration::from_millis(10), at(i * 10));
            ledger.append(&outcome).await.unwrap();
        }

        let recent = ledger.since(at(25)).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|o| o.timestamp() >= at(25)));
        assert!(recent.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));

        let future = ledger.since(Utc::now() + ChronoDuration::hours(1)).await.unwrap();
        assert!(future.is_empty());
    }

    #[tokio::test]
    async fn test_sub_millisecond_bound_is_not_rounded_down() {
        let dir = tempdir().unwrap();
        let ledger = open_ledger(&dir, "portal").await;
        ledger.append(&Outcome::from_response(200, Duration::ZERO, at(0))).await.unwrap();

        let just_after = at(0) + ChronoDuration::microseconds(700);
        assert!(ledger.since(just_after).await.unwrap().is_empty());

        let just_before = at(0) - ChronoDuration::microseconds(700);
        assert_eq!(ledger.since(just_before).await.unwrap().len(), 1);
        assert_eq!(ledger.since(at(0)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_monitors_sharing_a_file_are_isolated() {
        let dir = tempdir().unwrap();
        let portal = open_ledger(&dir, "portal").await;
        let api = open_ledger(&dir, "api").await;

        portal.append(&Outcome::from_response(200, Duration::ZERO, at(0))).await.unwrap();
        api.append(&Outcome::from_response(500, Duration::ZERO, at(0))).await.unwrap();

        let portal_rows = portal.since(at(0)).await.unwrap();
        assert_eq!(portal_rows.len(), 1);
        assert!(portal_rows[0].is_up());
    }

    #[tokio::test]
    async fn test_ledger_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let ledger = open_ledger(&dir, "portal").await;
            let outcome = Outcome::from_response(204, Duration::from_millis(3), at(0));
            ledger.append(&outcome).await.unwrap();
        }

        let reopened = open_ledger(&dir, "portal").await;
        let rows = reopened.since(at(0)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status_code(), Some(204));
    }
}
