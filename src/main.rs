// =============================================================================
// Market Lens — Main Entry Point
// =============================================================================
//
// Wires the upstream adapters into the analysis orchestrator and serves it
// over HTTP. Missing API keys do not stop startup: the affected adapter
// reports `NotConfigured` and every analysis falls back.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod cache;
mod error;
mod indicators;
mod orchestrator;
mod projection;
mod prompt;
mod providers;
mod runtime_config;
mod sentiment;
mod signals;
mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::cache::TtlCache;
use crate::orchestrator::{AnalysisOrchestrator, OrchestratorSettings};
use crate::providers::{CoinGeckoHistory, GeminiNarrator, NewsDataFeed};
use crate::runtime_config::RuntimeConfig;
use crate::sentiment::SentimentAggregator;

const CONFIG_PATH: &str = "market_lens.json";
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Market Lens starting up");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("MARKET_LENS_BIND_ADDR") {
        config.bind_addr = addr;
    }

    let newsdata_key = std::env::var("NEWSDATA_API_KEY").ok();
    let gemini_key = std::env::var("GEMINI_API_KEY").ok();
    if newsdata_key.is_none() {
        warn!("NEWSDATA_API_KEY not set, analyses will fall back");
    }
    if gemini_key.is_none() {
        warn!("GEMINI_API_KEY not set, analyses will fall back");
    }

    // ── 2. Upstream adapters ─────────────────────────────────────────────
    let news_cache = Arc::new(TtlCache::new());

    let history = CoinGeckoHistory::new(&config.coingecko_base_url, &config.vs_currency)
        .context("failed to build CoinGecko client")?;
    let news = NewsDataFeed::new(
        &config.newsdata_base_url,
        newsdata_key,
        config.news_page_size,
        news_cache.clone(),
        config.news_cache_ttl_minutes,
    )
    .context("failed to build NewsData client")?;
    let narrator = GeminiNarrator::new(&config.gemini_base_url, &config.gemini_model, gemini_key)
        .context("failed to build Gemini client")?;

    let orchestrator = AnalysisOrchestrator::new(
        Arc::new(history),
        Arc::new(news),
        Arc::new(narrator),
        SentimentAggregator::default(),
        OrchestratorSettings::from(&config),
    );

    info!(
        history_days = config.history_days,
        min_samples = config.min_samples,
        timeout_secs = config.analysis_timeout_secs,
        fetch_attempts = config.fetch_attempts,
        "Analysis orchestrator ready"
    );

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(orchestrator, config));

    // ── 3. News cache housekeeping ───────────────────────────────────────
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = news_cache.purge_expired();
            if purged > 0 {
                info!(purged, remaining = news_cache.len(), "news cache purged");
            }
        }
    });

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    // ── 5. Shutdown ──────────────────────────────────────────────────────
    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    let stats = state.orchestrator.stats().snapshot();
    info!(
        analyses = stats.analyses_served,
        fallbacks = stats.fallbacks_served,
        "Market Lens shut down complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
