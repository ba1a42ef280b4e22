use std::sync::Arc;

use pulse::{Distributor, HistoryStore, Pulse, QueryService};

/// Shared handles given to every worker
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<HistoryStore>,
    pub distributor: Distributor,
    pub query: QueryService,
}

impl AppState {
    pub fn new(history: Arc<HistoryStore>, distributor: Distributor) -> Self {
        let query = QueryService::new(history.clone());
        Self { history, distributor, query }
    }

    pub fn from_pulse(pulse: &Pulse) -> Self {
        Self::new(pulse.history(), pulse.distributor().clone())
    }
}
