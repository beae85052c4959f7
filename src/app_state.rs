// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Handlers hold `Arc<AppState>`. The orchestrator is immutable and cheap to
// share, and it keeps its own run statistics. The config is kept behind a
// `parking_lot::RwLock` so the health endpoint can report what the service is
// running with.
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::orchestrator::AnalysisOrchestrator;
use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(orchestrator: AnalysisOrchestrator, runtime_config: RuntimeConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            runtime_config: Arc::new(RwLock::new(runtime_config)),
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
