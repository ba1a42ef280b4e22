use std::time::Duration;
use std::{env, fmt, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distributor::DEFAULT_SUBSCRIBER_BUFFER;
use crate::history::DEFAULT_WINDOW_CAPACITY;
use crate::monitoring::MonitorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    ReadFailed(path::PathBuf, #[source] std::io::Error),
    #[error("failed to write config {0}: {1}")]
    WriteFailed(path::PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseFailed(String),
    #[error("no config path available: neither XDG_CONFIG_HOME nor HOME is set")]
    ConfigPathUnavailable,
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorSettings,
    pub storage: StorageSettings,
    pub distributor: DistributorSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub name: String,
    pub target: String,
    pub interval_seconds: u64,
    pub timeout_seconds: u64,
    pub window_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Libsql,
    Csv,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Libsql => write!(f, "libsql"),
            StorageBackend::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: path::PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributorSettings {
    pub buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
    pub allowed_origin: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            name: "portal".into(),
            target: "https://example.com/".into(),
            interval_seconds: 5,
            timeout_seconds: 10,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { backend: StorageBackend::Libsql, path: "pulse.db".into() }
    }
}

impl Default for DistributorSettings {
    fn default() -> Self {
        Self { buffer: DEFAULT_SUBSCRIBER_BUFFER }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8000, allowed_origin: "http://localhost:3000".into() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorSettings::default(),
            storage: StorageSettings::default(),
            distributor: DistributorSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/pulse/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("pulse/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Configuration:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Name", &self.monitor.name)?;
        write_1(f, "Target", &self.monitor.target)?;
        write_1(f, "Interval (s)", &self.monitor.interval_seconds)?;
        write_1(f, "Timeout (s)", &self.monitor.timeout_seconds)?;
        write_1(f, "Window", &self.monitor.window_capacity)?;
        write_title_1(f, "Storage")?;
        write_1(f, "Backend", &self.storage.backend)?;
        write_1(f, "Path", &self.storage.path.display())?;
        write_title_1(f, "Distributor")?;
        write_1(f, "Buffer", &self.distributor.buffer)?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;
        write_1(f, "Allowed Origin", &self.server.allowed_origin)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/pulse/config.toml
    ///  or the specified path, with the name config.toml if one does not exist.
    /// Values from the environment (and a `.env` file) are applied on top.
    ///
    /// ```no_run
    /// let cfg = pulse::Config::from_config(None::<&std::path::Path>)?;
    /// println!("{}", cfg);
    /// # Ok::<(), pulse::config::ConfigError>(())
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let mut config = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|err| ConfigError::ReadFailed(config_path.clone(), err))?;
            Self::from_toml(&raw_string)?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            tracing::info!(path = %config_path.display(), "Wrote default config");
            config
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::ParseFailed(err.to_string()))
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String =
            toml::to_string_pretty(self).map_err(|err| ConfigError::ParseFailed(err.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| ConfigError::WriteFailed(path.to_path_buf(), err))?;
        }

        fs::write(path, config_str).map_err(|err| ConfigError::WriteFailed(path.to_path_buf(), err))
    }

    /// Apply `PULSE_TARGET`, `PULSE_INTERVAL_SECONDS` and
    /// `PULSE_TIMEOUT_SECONDS`. Unparseable numbers are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(target) = lookup("PULSE_TARGET") {
            self.monitor.target = target;
        }
        if let Some(secs) = lookup("PULSE_INTERVAL_SECONDS").and_then(|v| v.parse().ok()) {
            self.monitor.interval_seconds = secs;
        }
        if let Some(secs) = lookup("PULSE_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.monitor.timeout_seconds = secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.monitor.target)
            .map_err(|e| ConfigError::Invalid(format!("target {:?}: {e}", self.monitor.target)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!("unsupported scheme: {}", url.scheme())));
        }
        if self.monitor.interval_seconds == 0 {
            return Err(ConfigError::Invalid("interval_seconds must be positive".into()));
        }
        if self.monitor.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("timeout_seconds must be positive".into()));
        }
        if self.monitor.window_capacity == 0 {
            return Err(ConfigError::Invalid("window_capacity must be positive".into()));
        }
        if self.distributor.buffer == 0 {
            return Err(ConfigError::Invalid("distributor buffer must be positive".into()));
        }
        Ok(())
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(&self.monitor.name, &self.monitor.target)
            .with_interval(Duration::from_secs(self.monitor.interval_seconds))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_monitoring_cadence() {
        let config = Config::default();
        assert_eq!(config.monitor.interval_seconds, 5);
        assert_eq!(config.monitor.timeout_seconds, 10);
        assert_eq!(config.monitor.window_capacity, 100);
        assert_eq!(config.storage.backend, StorageBackend::Libsql);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [monitor]
            target = "https://portal.example.org/"

            [storage]
            backend = "csv"
            path = "stability_log.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.monitor.target, "https://portal.example.org/");
        assert_eq!(config.monitor.interval_seconds, 5);
        assert_eq!(config.storage.backend, StorageBackend::Csv);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config");

        let config = Config::from_config(Some(&path)).unwrap();

        assert!(dir.path().join("nested/config.toml").exists());
        let reloaded = Config::from_config(Some(&path)).unwrap();
        assert_eq!(reloaded.monitor.name, config.monitor.name);
    }

    #[test]
    fn test_overrides_and_validation() {
        let vars: HashMap<&str, &str> = [
            ("PULSE_TARGET", "ftp://example.com"),
            ("PULSE_INTERVAL_SECONDS", "30"),
            ("PULSE_TIMEOUT_SECONDS", "nope"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.monitor.interval_seconds, 30);
        assert_eq!(config.monitor.timeout_seconds, 10);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.monitor.interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_lists_sections() {
        let rendered = Config::default().to_string();
        assert!(rendered.contains("Monitor"));
        assert!(rendered.contains("Target: https://example.com/"));
        assert!(rendered.contains("Allowed Origin: http://localhost:3000"));
    }
}
