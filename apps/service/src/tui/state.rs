use chrono::{DateTime, Local};
use std::time::Duration;

use pulse::{DownReason, MonitorConfig, MonitorStatus, Outcome};

use super::types::Theme;

/// Everything the dashboard shows, rebuilt from each published outcome
pub struct DashboardState {
    pub monitor_name: String,
    pub target: String,
    pub interval: Duration,
    pub theme: Theme,

    pub status: Option<MonitorStatus>,
    pub latency_ms: Option<i64>,
    pub last_check: Option<DateTime<Local>>,
    pub last_error: Option<String>,
    pub checks: u64,

    // Rolling window, not the ledger
    pub uptime: f64,
    pub window_len: usize,
    pub window_capacity: usize,
}

impl DashboardState {
    pub fn new(monitor: &MonitorConfig, window_capacity: usize) -> Self {
        Self {
            monitor_name: monitor.name.clone(),
            target: monitor.target.clone(),
            interval: monitor.interval,
            theme: Theme::default(),
            status: None,
            latency_ms: None,
            last_check: None,
            last_error: None,
            checks: 0,
            uptime: 100.0,
            window_len: 0,
            window_capacity,
        }
    }

    /// Take in a new outcome together with the window figures it produced
    pub fn apply(&mut self, outcome: &Outcome, uptime: f64, window_len: usize) {
        self.status = Some(outcome.status());
        self.latency_ms = Some(outcome.latency_ms()).filter(|ms| *ms >= 0);
        self.last_check = Some(outcome.timestamp().with_timezone(&Local));
        self.last_error = outcome.error().map(str::to_string);
        self.checks += 1;
        self.uptime = uptime;
        self.window_len = window_len;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn status_text(&self) -> String {
        match self.status {
            None => "PENDING...".to_string(),
            Some(MonitorStatus::Up) => "UP".to_string(),
            Some(MonitorStatus::Down(DownReason::HttpStatus(code))) => format!("DOWN ({code})"),
            Some(MonitorStatus::Down(DownReason::ConnectionError)) => {
                "DOWN (connection error)".to_string()
            }
            Some(MonitorStatus::Down(DownReason::Timeout)) => "DOWN (timeout)".to_string(),
        }
    }

    pub fn latency_text(&self) -> String {
        match self.latency_ms {
            Some(ms) => format!("{ms} ms"),
            None => "--- ms".to_string(),
        }
    }

    pub fn last_check_text(&self) -> String {
        match self.last_check {
            Some(at) => at.format("%H:%M:%S").to_string(),
            None => "Never".to_string(),
        }
    }

    pub fn uptime_text(&self) -> String {
        format!("{:.2}%", self.uptime)
    }
}
