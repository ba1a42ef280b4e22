//! Wiring of the core components for one monitored target.

use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StorageBackend, StorageSettings};
use crate::database::LibsqlLedger;
use crate::distributor::{Distributor, Subscription};
use crate::error::{Error, Result};
use crate::history::{CsvLedger, HistoryStore, Ledger};
use crate::monitoring::{HttpProber, MonitorConfig, Prober, Scheduler, SchedulerHandle};
use crate::query::QueryService;

/// Open the ledger selected by `storage`, scoped to `monitor`
pub async fn open_ledger(storage: &StorageSettings, monitor: &str) -> Result<Arc<dyn Ledger>> {
    info!(backend = %storage.backend, path = %storage.path.display(), "Opening ledger");

    let ledger: Arc<dyn Ledger> = match storage.backend {
        StorageBackend::Csv => Arc::new(CsvLedger::open(&storage.path).await?),
        StorageBackend::Libsql => {
            let path = storage.path.to_str().ok_or_else(|| {
                Error::Pool(format!("database path is not UTF-8: {}", storage.path.display()))
            })?;
            Arc::new(LibsqlLedger::open(path, monitor).await?)
        }
    };

    Ok(ledger)
}

/// One target's prober, store and distributor, ready to be started
pub struct Pulse {
    config: MonitorConfig,
    prober: Arc<dyn Prober>,
    history: Arc<HistoryStore>,
    distributor: Distributor,
}

impl Pulse {
    pub fn new(
        config: MonitorConfig,
        prober: Arc<dyn Prober>,
        history: Arc<HistoryStore>,
        distributor: Distributor,
    ) -> Self {
        Self { config, prober, history, distributor }
    }

    /// Build the HTTP prober and the configured ledger
    pub async fn from_config(config: &Config) -> Result<Self> {
        let ledger = open_ledger(&config.storage, &config.monitor.name).await?;
        let history = Arc::new(HistoryStore::new(ledger, config.monitor.window_capacity));
        let prober = Arc::new(HttpProber::new(config.timeout())?);

        Ok(Self::new(
            config.monitor_config(),
            prober,
            history,
            Distributor::new(config.distributor.buffer),
        ))
    }

    pub fn monitor(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn history(&self) -> Arc<HistoryStore> {
        self.history.clone()
    }

    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }

    pub fn subscribe(&self) -> Subscription {
        self.distributor.subscribe()
    }

    pub fn query(&self) -> QueryService {
        QueryService::new(self.history.clone())
    }

    /// Spawn a scheduler over these components
    pub fn start(&self) -> SchedulerHandle {
        Scheduler::new(
            self.config.clone(),
            self.prober.clone(),
            self.history.clone(),
            self.distributor.clone(),
        )
        .start()
    }
}
