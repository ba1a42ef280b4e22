use std::collections::VecDeque;
use std::sync::Arc;

use crate::monitoring::types::Outcome;

/// Default number of outcomes kept for the recent-uptime figure
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

/// Fixed-capacity FIFO of the most recent outcomes. Never persisted.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    entries: VecDeque<Arc<Outcome>>,
}

impl RollingWindow {
    /// A capacity of zero is bumped to one so the window can always hold the
    /// latest outcome.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, entries: VecDeque::with_capacity(capacity) }
    }

    /// Push an outcome, evicting the oldest when full
    pub fn push(&mut self, outcome: Arc<Outcome>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(outcome);
    }

    /// Percentage of UP outcomes; 100 when empty
    pub fn uptime(&self) -> f64 {
        if self.entries.is_empty() {
            return 100.0;
        }
        let up = self.entries.iter().filter(|o| o.is_up()).count();
        up as f64 / self.entries.len() as f64 * 100.0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<Arc<Outcome>> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    fn outcome(up: bool, offset_secs: i64) -> Arc<Outcome> {
        let at = Utc::now() + ChronoDuration::seconds(offset_secs);
        let code = if up { 200 } else { 500 };
        Arc::new(Outcome::from_response(code, Duration::from_millis(10), at))
    }

    #[test]
    fn test_empty_window_is_optimistic() {
        let window = RollingWindow::new(DEFAULT_WINDOW_CAPACITY);
        assert_eq!(window.uptime(), 100.0);
        assert!(window.is_empty());
    }

    #[test]
    fn test_uptime_is_exact_ratio() {
        let mut window = RollingWindow::new(10);
        for (i, up) in [true, false, true, true, false, true, true, true].into_iter().enumerate() {
            window.push(outcome(up, i as i64));
        }
        assert_eq!(window.uptime(), 6.0 / 8.0 * 100.0);
    }

    #[test]
    fn test_capacity_three_scenario() {
        let mut window = RollingWindow::new(3);
        for (i, up) in [true, true, false, true].into_iter().enumerate() {
            window.push(outcome(up, i as i64));
        }

        let statuses: Vec<bool> = window.snapshot().iter().map(|o| o.is_up()).collect();
        assert_eq!(statuses, vec![true, false, true]);
        assert!((window.uptime() - 66.67).abs() < 0.01);
    }

    #[test]
    fn test_eviction_drops_oldest_keeps_newest() {
        let capacity = 5;
        let mut window = RollingWindow::new(capacity);
        let pushed: Vec<Arc<Outcome>> = (0..=capacity as i64).map(|i| outcome(true, i)).collect();
        for o in &pushed {
            window.push(o.clone());
        }

        assert_eq!(window.len(), capacity);
        let snapshot = window.snapshot();
        assert!(!snapshot.contains(&pushed[0]));
        assert_eq!(snapshot.last(), pushed.last());
    }

    #[test]
    fn test_zero_capacity_still_holds_latest() {
        let mut window = RollingWindow::new(0);
        window.push(outcome(false, 0));
        window.push(outcome(true, 1));
        assert_eq!(window.len(), 1);
        assert_eq!(window.uptime(), 100.0);
    }
}
