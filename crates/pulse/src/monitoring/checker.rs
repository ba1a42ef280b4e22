use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::types::{DownReason, Outcome};
use crate::error::Result;

/// Issues a single health check and classifies the result.
///
/// Implementations must not fail: every transport problem is encoded in the
/// returned [`Outcome`].
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn check(&self, target: &str) -> Outcome;
}

/// HTTP/HTTPS prober
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Build a prober whose requests are bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }

    /// Use a preconfigured client; its timeout bounds each check
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn check(&self, target: &str) -> Outcome {
        let start = Instant::now();

        let mut response = match self.client.get(target).send().await {
            Ok(response) => response,
            Err(e) => return transport_failure(target, &e),
        };

        let status_code = response.status().as_u16();

        // Latency covers the full body, drained chunk by chunk without buffering
        loop {
            match response.chunk().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => return transport_failure(target, &e),
            }
        }

        let latency = start.elapsed();
        debug!(
            url = target,
            status_code,
            latency_ms = latency.as_millis() as u64,
            "Probe completed"
        );
        Outcome::from_response(status_code, latency, Utc::now())
    }
}

fn transport_failure(target: &str, error: &reqwest::Error) -> Outcome {
    let reason = if error.is_timeout() {
        DownReason::Timeout
    } else {
        DownReason::ConnectionError
    };

    debug!(url = target, reason = reason.as_str(), "Probe failed: {}", error);
    Outcome::from_transport_failure(reason, Some(error.to_string()), Utc::now())
}
