use anyhow::Result;
use chrono::Local;
use tracing::info;

use pulse::{Outcome, Pulse};

/// One console line per check, in local time
pub fn format_log_line(outcome: &Outcome) -> String {
    let timestamp = outcome.timestamp().with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    format!("[{timestamp}] Status: {}", outcome.status().log_token())
}

/// Run the scheduler without a UI until ctrl-c
pub async fn run_logger(pulse: &Pulse) -> Result<()> {
    let mut subscription = pulse.subscribe();
    let scheduler = pulse.start();
    info!(url = %pulse.monitor().target, "Stability logging started");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupt received, stopping");
                break;
            }
            next = subscription.recv() => match next {
                Some(outcome) => println!("{}", format_log_line(&outcome)),
                None => subscription = pulse.subscribe(),
            },
        }
    }

    scheduler.stop().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pulse::DownReason;
    use std::time::Duration;

    #[test]
    fn test_log_line_tokens() {
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        let local = at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();

        let up = Outcome::from_response(200, Duration::from_millis(5), at);
        assert_eq!(format_log_line(&up), format!("[{local}] Status: UP"));

        let down = Outcome::from_response(502, Duration::from_millis(5), at);
        assert_eq!(format_log_line(&down), format!("[{local}] Status: DOWN_502"));

        let refused = Outcome::from_transport_failure(DownReason::ConnectionError, None, at);
        assert_eq!(format_log_line(&refused), format!("[{local}] Status: DOWN_CONNECTION_ERROR"));
    }
}
