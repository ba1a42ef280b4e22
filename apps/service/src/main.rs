use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use pulse::{Config, Period, Pulse};

mod headless;
mod report;
mod tui;

#[derive(Debug, Parser)]
#[command(version, about = "Terminal dashboard, stability logger and uptime report for one URL")]
struct Cli {
    /// Config file, defaults to $XDG_CONFIG_HOME/pulse/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Live dashboard (default)
    Dashboard,
    /// Print one line per check until interrupted
    Log,
    /// Summarise the ledger over a period
    Report {
        /// today, 12h or 24h; anything else means 12h
        #[arg(short, long, default_value = "12h")]
        period: String,
    },
}

/// Dashboard logs go next to the ledger so they do not draw over the UI
fn dashboard_log_path(ledger: &Path) -> PathBuf {
    ledger.with_file_name("pulse-service.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_config(cli.config.as_ref()).context("loading config")?;

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            let log_path = dashboard_log_path(&config.storage.path);
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .with_context(|| format!("opening {}", log_path.display()))?;
            logger::init_tracing_with_writer(Arc::new(log_file));

            let pulse = Pulse::from_config(&config).await?;
            tui::run_dashboard(&pulse).await
        }
        Command::Log => {
            logger::init_tracing();
            println!("{config}");

            let pulse = Pulse::from_config(&config).await?;
            headless::run_logger(&pulse).await
        }
        Command::Report { period } => {
            logger::init_tracing();

            let pulse = Pulse::from_config(&config).await?;
            let report =
                report::Report::compute(&pulse.history(), Period::parse(&period), &Local::now())
                    .await?;
            println!("{report}");
            Ok(())
        }
    }
}
