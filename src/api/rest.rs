// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET /api/v1/health            liveness plus counters
//   GET /api/v1/analysis/:asset   one fresh AnalysisReport
//
// The analysis endpoint always answers 200: a failed run still produces the
// fallback report, which is a valid response body.
//
// CORS is permissive; the service is read-only.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app_state::AppState;
use crate::orchestrator::StatsSnapshot;

/// Build the REST router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analysis/:asset", get(analysis))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
    vs_currency: String,
    analysis_timeout_secs: u64,
    #[serde(flatten)]
    stats: StatsSnapshot,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (vs_currency, analysis_timeout_secs) = {
        let cfg = state.runtime_config.read();
        (cfg.vs_currency.clone(), cfg.analysis_timeout_secs)
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        vs_currency,
        analysis_timeout_secs,
        stats: state.orchestrator.stats().snapshot(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analysis
// =============================================================================

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(asset): Path<String>,
) -> impl IntoResponse {
    let asset = asset.trim().to_lowercase();
    let report = state.orchestrator.analyze(&asset).await;

    info!(asset = %asset, fallback = report.is_fallback(), "analysis served");
    Json(report)
}
