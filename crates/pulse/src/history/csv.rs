//! Human-readable CSV ledger.
//!
//! One line per check: `timestamp,status,status_code,latency_ms`, where the
//! status uses the log tokens (`UP`, `DOWN_503`, `DOWN_CONNECTION_ERROR`,
//! `DOWN_TIMEOUT`) and the timestamp is RFC 3339 UTC with milliseconds.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, SeekFrom};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ledger::Ledger;
use crate::error::{Error, Result};
use crate::monitoring::types::{DownReason, Outcome};

pub const CSV_HEADER: &str = "timestamp,status,status_code,latency_ms";

struct Writer {
    file: File,
    /// Set when the file may end in a partial line
    needs_newline: bool,
}

/// Append-only CSV file ledger
pub struct CsvLedger {
    path: PathBuf,
    writer: Mutex<Writer>,
}

impl CsvLedger {
    /// Open (or create) the log at `path`, writing the header to new files
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new().create(true).append(true).read(true).open(&path).await?;
        let len = file.metadata().await?.len();

        let needs_newline = if len == 0 {
            file.write_all(format!("{CSV_HEADER}\n").as_bytes()).await?;
            file.sync_data().await?;
            false
        } else {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).await?;
            file.read_exact(&mut last).await?;
            last[0] != b'\n'
        };

        if needs_newline {
            warn!(path = %path.display(), "CSV ledger ends with a partial record");
        }

        Ok(Self { path, writer: Mutex::new(Writer { file, needs_newline }) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Ledger for CsvLedger {
    async fn append(&self, outcome: &Outcome) -> Result<()> {
        let mut writer = self.writer.lock().await;

        let mut record = String::new();
        if writer.needs_newline {
            record.push('\n');
        }
        record.push_str(&format_record(outcome));
        record.push('\n');

        // A failed write may have left part of the record behind
        writer.needs_newline = true;
        writer.file.write_all(record.as_bytes()).await?;
        writer.file.sync_data().await?;
        writer.needs_newline = false;
        Ok(())
    }

    async fn since(&self, since: DateTime<Utc>) -> Result<Vec<Outcome>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut outcomes = Vec::new();
        for (line_no, bytes) in raw.split(|b| *b == b'\n').enumerate() {
            let line = match std::str::from_utf8(bytes) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!(line = line_no + 1, "Skipping CSV record: {}", e);
                    continue;
                }
            };
            if line.is_empty() || line == CSV_HEADER {
                continue;
            }
            match parse_record(line) {
                Ok(outcome) if outcome.timestamp() >= since => outcomes.push(outcome),
                Ok(_) => {}
                Err(e) => warn!(line = line_no + 1, "Skipping CSV record: {}", e),
            }
        }

        outcomes.sort_by_key(Outcome::timestamp);
        debug!(count = outcomes.len(), %since, "CSV ledger query");
        Ok(outcomes)
    }
}

/// Render one outcome as a CSV line, without the trailing newline
pub fn format_record(outcome: &Outcome) -> String {
    format!(
        "{},{},{},{}",
        outcome.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
        outcome.status().log_token(),
        outcome.status_code().map(|c| c.to_string()).unwrap_or_default(),
        outcome.latency_ms()
    )
}

/// Parse a line produced by [`format_record`]
pub fn parse_record(line: &str) -> Result<Outcome> {
    let invalid = |msg: &str| Error::InvalidRecord(format!("{msg}: {line:?}"));

    let fields: Vec<&str> = line.split(',').collect();
    let [timestamp, token, code, latency] = fields.as_slice() else {
        return Err(invalid("expected 4 fields"));
    };

    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|_| invalid("bad timestamp"))?
        .with_timezone(&Utc);
    let latency_ms: i64 = latency.parse().map_err(|_| invalid("bad latency"))?;

    let outcome = if code.is_empty() {
        let reason = match *token {
            "DOWN_TIMEOUT" => DownReason::Timeout,
            "DOWN_CONNECTION_ERROR" => DownReason::ConnectionError,
            _ => return Err(invalid("status needs a code")),
        };
        Outcome::from_transport_failure(reason, None, timestamp)
    } else {
        let code: u16 = code.parse().map_err(|_| invalid("bad status code"))?;
        Outcome::from_response_ms(code, latency_ms, timestamp)
    };

    if outcome.status().log_token() != *token {
        return Err(invalid("status does not match code"));
    }
    Ok(outcome)
}
