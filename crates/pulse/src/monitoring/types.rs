use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Latency recorded when no response was obtained.
pub const LATENCY_SENTINEL: i64 = -1;

/// Why a check was classified as down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "code")]
pub enum DownReason {
    /// A response arrived with a code outside `[200, 300)`
    HttpStatus(u16),
    ConnectionError,
    Timeout,
}

impl DownReason {
    /// Column value used by the ledger back-ends
    pub fn as_str(&self) -> &'static str {
        match self {
            DownReason::HttpStatus(_) => "http_status",
            DownReason::ConnectionError => "connection_error",
            DownReason::Timeout => "timeout",
        }
    }
}

/// Status of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonitorStatus {
    Up,
    Down(DownReason),
}

impl MonitorStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, MonitorStatus::Up)
    }

    /// Token written to the human-readable log: `UP`, `DOWN_503`,
    /// `DOWN_CONNECTION_ERROR` or `DOWN_TIMEOUT`.
    pub fn log_token(&self) -> String {
        match self {
            MonitorStatus::Up => "UP".to_string(),
            MonitorStatus::Down(DownReason::HttpStatus(code)) => format!("DOWN_{code}"),
            MonitorStatus::Down(DownReason::ConnectionError) => "DOWN_CONNECTION_ERROR".to_string(),
            MonitorStatus::Down(DownReason::Timeout) => "DOWN_TIMEOUT".to_string(),
        }
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "UP"),
            MonitorStatus::Down(_) => write!(f, "DOWN"),
        }
    }
}

/// Result of a single health check.
///
/// Outcomes can only be built through [`Outcome::from_response`] and
/// [`Outcome::from_transport_failure`], which keeps the classification rules
/// in one place: a status code is present exactly when a response was
/// received, and only then is the latency non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    timestamp: DateTime<Utc>,
    status: MonitorStatus,
    latency_ms: i64,
    status_code: Option<u16>,
    error: Option<String>,
}

impl Outcome {
    /// Classify a received response
    pub fn from_response(status_code: u16, latency: Duration, timestamp: DateTime<Utc>) -> Self {
        let latency_ms = i64::try_from(latency.as_millis()).unwrap_or(i64::MAX);
        Self::from_response_ms(status_code, latency_ms, timestamp)
    }

    pub(crate) fn from_response_ms(
        status_code: u16,
        latency_ms: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let status = if (200..300).contains(&status_code) {
            MonitorStatus::Up
        } else {
            MonitorStatus::Down(DownReason::HttpStatus(status_code))
        };

        Self {
            timestamp: timestamp.trunc_subsecs(3),
            status,
            latency_ms: latency_ms.max(0),
            status_code: Some(status_code),
            error: None,
        }
    }

    /// Record a check that never got a response.
    ///
    /// `reason` is coerced to a connection error when given an HTTP status,
    /// since no status was observed.
    pub fn from_transport_failure(
        reason: DownReason,
        error: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let reason = match reason {
            DownReason::HttpStatus(_) => DownReason::ConnectionError,
            other => other,
        };

        Self {
            timestamp: timestamp.trunc_subsecs(3),
            status: MonitorStatus::Down(reason),
            latency_ms: LATENCY_SENTINEL,
            status_code: None,
            error,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    /// Milliseconds from dispatch to response, or [`LATENCY_SENTINEL`]
    pub fn latency_ms(&self) -> i64 {
        self.latency_ms
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The down reason, if any
    pub fn reason(&self) -> Option<DownReason> {
        match self.status {
            MonitorStatus::Up => None,
            MonitorStatus::Down(reason) => Some(reason),
        }
    }
}
