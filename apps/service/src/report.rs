use chrono::{DateTime, TimeZone};
use std::fmt;

use pulse::{HistoryStore, Period};

/// Ledger summary over one period
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub period: Period,
    pub total: usize,
    pub up: usize,
    pub uptime: f64,
}

impl Report {
    pub async fn compute<Tz: TimeZone>(
        history: &HistoryStore,
        period: Period,
        now: &DateTime<Tz>,
    ) -> pulse::Result<Self> {
        let outcomes = history.query(period.since(now)).await?;
        let total = outcomes.len();
        let up = outcomes.iter().filter(|o| o.is_up()).count();
        let uptime = if total == 0 { 100.0 } else { up as f64 / total as f64 * 100.0 };

        Ok(Self { period, total, up, uptime })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Period:  {}", self.period.as_str())?;
        writeln!(f, "Checks:  {}", self.total)?;
        writeln!(f, "Up:      {}", self.up)?;
        write!(f, "Uptime:  {:.2}%", self.uptime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use pulse::history::CsvLedger;
    use pulse::Outcome;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_report_counts_ledger_records_in_period() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::open(dir.path().join("stability_log.csv")).await.unwrap();
        let history = HistoryStore::new(Arc::new(ledger), 2);
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();

        // One old failure outside 12h, then 3 UP and 1 DOWN inside it
        for (hours_ago, code) in [(20, 500), (4, 200), (3, 200), (2, 503), (1, 200)] {
            let at = now - ChronoDuration::hours(hours_ago);
            let outcome = Outcome::from_response(code, Duration::from_millis(10), at);
            history.append(Arc::new(outcome)).await.unwrap();
        }

        let report = Report::compute(&history, Period::Last12Hours, &now).await.unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.up, 3);
        assert_eq!(report.uptime, 75.0);
        assert!(report.to_string().ends_with("Uptime:  75.00%"));

        let day = Report::compute(&history, Period::Last24Hours, &now).await.unwrap();
        assert_eq!(day.total, 5);
        assert_eq!(day.uptime, 60.0);
    }

    #[tokio::test]
    async fn test_empty_report_is_optimistic() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = CsvLedger::open(dir.path().join("log.csv")).await.unwrap();
        let history = HistoryStore::new(Arc::new(ledger), 2);

        let report = Report::compute(&history, Period::Today, &Utc::now()).await.unwrap();

        assert_eq!(report.total, 0);
        assert_eq!(report.uptime, 100.0);
    }
}
