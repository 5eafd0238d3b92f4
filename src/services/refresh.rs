use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::config::Config;
use crate::services::aggregator::{self, Aggregate};
use crate::services::client::MarketSource;
use crate::services::error::RunError;
use crate::services::progress::ProgressLog;
use crate::types::models::{MarketStats, RuneRecord, SortState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Idle,
    Running,
    Ready,
    Failed,
}

/// Everything the dashboard renders. Transitions:
/// idle -> running -> (ready | failed), and back to running on refresh.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: RunPhase,
    pub records: Vec<RuneRecord>,
    pub stats: MarketStats,
    pub reference_price: Option<f64>,
    pub error: Option<String>,
    pub sort: SortState,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            phase: RunPhase::Idle,
            records: Vec::new(),
            stats: MarketStats::default(),
            reference_price: None,
            error: None,
            sort: SortState::default(),
            updated_at: None,
        }
    }
}

impl DashboardState {
    pub fn begin(&mut self) {
        self.phase = RunPhase::Running;
        self.error = None;
    }

    pub fn complete(&mut self, aggregate: Aggregate) {
        self.phase = RunPhase::Ready;
        self.records = aggregate.records;
        self.stats = aggregate.stats;
        self.reference_price = Some(aggregate.reference_price);
        self.error = None;
        self.updated_at = Some(Utc::now());
    }

    /// No partial table survives a fatal run.
    pub fn fail(&mut self, message: String) {
        self.phase = RunPhase::Failed;
        self.records.clear();
        self.stats = MarketStats::default();
        self.error = Some(message);
    }
}

/// Owns the dashboard state and guarantees at most one run in flight.
pub struct Dashboard {
    pub state: RwLock<DashboardState>,
    pub progress: ProgressLog,
    pub config: Config,
    source: Arc<dyn MarketSource>,
    run_lock: Arc<Mutex<()>>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn MarketSource>, config: Config) -> Self {
        Self {
            state: RwLock::new(DashboardState::default()),
            progress: ProgressLog::new(),
            config,
            source,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Spawns a new aggregation run, or fails fast if one is in flight.
    pub async fn start_run(self: &Arc<Self>) -> Result<(), RunError> {
        let guard = self
            .run_lock
            .clone()
            .try_lock_owned()
            .map_err(|_| RunError::AlreadyRunning)?;

        self.progress.reset("Starting data fetch...");
        self.state.write().await.begin();

        let dashboard = Arc::clone(self);
        tokio::spawn(async move {
            dashboard.execute(guard).await;
        });

        Ok(())
    }

    async fn execute(&self, guard: OwnedMutexGuard<()>) {
        let result = aggregator::run(self.source.as_ref(), &self.config, &self.progress).await;
        let mut state = self.state.write().await;
        match result {
            Ok(aggregate) => {
                tracing::info!(
                    "Aggregation finished: {} runes at ${} per BTC",
                    aggregate.records.len(),
                    aggregate.reference_price
                );
                state.complete(aggregate);
            }
            Err(e) => {
                tracing::error!("Aggregation failed: {}", e);
                state.fail(e.to_string());
            }
        }
        // Released while the state lock is still held, so a reader that sees
        // the settled phase can immediately start the next run.
        drop(guard);
    }
}
