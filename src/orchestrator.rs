// =============================================================================
// Analysis Orchestrator — one run from asset id to report
// =============================================================================
//
// Life-cycle:
//   Fetching -> Computing -> EnrichingSentiment -> GeneratingNarrative
//            -> Assembled
//   any stage -> Failed   (fallback report returned)
//
// Only the three external calls suspend. Every one of them is raced against
// the run deadline; the two fetch steps are retried up to `fetch_attempts`
// times with a fixed backoff. The numeric stage cannot fail once the series
// has passed validation.
//
// `analyze` never returns an error. Any failure is logged at `warn` with the
// stage it happened in and converted into `AnalysisReport::fallback`.
// Every outcome, success or fallback, is folded into `AnalysisStats`, which
// the health endpoint reports.
// =============================================================================

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use crate::error::{AnalysisError, ProviderError};
use crate::indicators::{IndicatorBundle, MarketPhase};
use crate::projection::ProjectionEngine;
use crate::prompt::{build_prompt, market_summary};
use crate::providers::{
    HistoricalDataProvider, HistoricalSeries, NarrativeGenerator, NewsItem, NewsProvider,
};
use crate::runtime_config::RuntimeConfig;
use crate::sentiment::SentimentAggregator;
use crate::signals::SignalGenerator;
use crate::types::{
    AnalysisReport, MarketStructure, Position, PriceSeries, Quote, StrategyRecommendation,
};

/// Fibonacci retracement used for the entry level.
const ENTRY_RETRACEMENT: f64 = 0.382;
/// Stop sits this fraction below support.
const STOP_BELOW_SUPPORT: f64 = 0.05;
/// Stand-in deadline when the configured timeout overflows `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Fetching,
    Computing,
    EnrichingSentiment,
    GeneratingNarrative,
    Assembled,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "Fetching",
            Self::Computing => "Computing",
            Self::EnrichingSentiment => "EnrichingSentiment",
            Self::GeneratingNarrative => "GeneratingNarrative",
            Self::Assembled => "Assembled",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a run, with enough detail for tests and logs to tell a
/// successful report from a fallback.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// `Assembled` or `Failed`.
    pub final_stage: AnalysisStage,
    /// Stage that was running when the failure happened.
    pub failed_at: Option<AnalysisStage>,
    pub failure: Option<AnalysisError>,
    pub report: AnalysisReport,
}

// ---------------------------------------------------------------------------
// Run statistics
// ---------------------------------------------------------------------------

/// The most recent failed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub asset: String,
    pub stage: &'static str,
    pub error: String,
    pub at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub analyses_served: u64,
    pub fallbacks_served: u64,
    pub last_failure: Option<FailureRecord>,
}

/// Counters updated from every `AnalysisOutcome`.
#[derive(Debug, Default)]
pub struct AnalysisStats {
    analyses_served: AtomicU64,
    fallbacks_served: AtomicU64,
    last_failure: RwLock<Option<FailureRecord>>,
}

impl AnalysisStats {
    pub fn record(&self, asset: &str, outcome: &AnalysisOutcome) {
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
        if outcome.final_stage != AnalysisStage::Failed {
            return;
        }

        self.fallbacks_served.fetch_add(1, Ordering::Relaxed);
        if let (Some(stage), Some(err)) = (outcome.failed_at, &outcome.failure) {
            *self.last_failure.write() = Some(FailureRecord {
                asset: asset.to_string(),
                stage: stage.as_str(),
                error: err.to_string(),
                at: outcome.report.generated_at.clone(),
            });
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            analyses_served: self.analyses_served.load(Ordering::Relaxed),
            fallbacks_served: self.fallbacks_served.load(Ordering::Relaxed),
            last_failure: self.last_failure.read().clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub history_days: u32,
    pub min_samples: usize,
    pub timeout: Duration,
    pub fetch_attempts: u32,
    pub retry_backoff: Duration,
    pub headline_count: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

impl From<&RuntimeConfig> for OrchestratorSettings {
    fn from(cfg: &RuntimeConfig) -> Self {
        Self {
            history_days: cfg.history_days,
            min_samples: cfg.min_samples,
            timeout: cfg.analysis_timeout(),
            fetch_attempts: cfg.fetch_attempts.max(1),
            retry_backoff: cfg.retry_backoff(),
            headline_count: cfg.headline_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    history: Arc<dyn HistoricalDataProvider>,
    news: Arc<dyn NewsProvider>,
    narrator: Arc<dyn NarrativeGenerator>,
    sentiment: SentimentAggregator,
    settings: OrchestratorSettings,
    stats: Arc<AnalysisStats>,
}

impl AnalysisOrchestrator {
    pub fn new(
        history: Arc<dyn HistoricalDataProvider>,
        news: Arc<dyn NewsProvider>,
        narrator: Arc<dyn NarrativeGenerator>,
        sentiment: SentimentAggregator,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            history,
            news,
            narrator,
            sentiment,
            settings,
            stats: Arc::new(AnalysisStats::default()),
        }
    }

    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    /// Analyse `asset` under the configured deadline.
    pub async fn analyze(&self, asset: &str) -> AnalysisReport {
        self.analyze_until(asset, deadline_after(self.settings.timeout))
            .await
    }

    /// Analyse `asset`, giving up at `deadline`.
    pub async fn analyze_until(&self, asset: &str, deadline: Instant) -> AnalysisReport {
        self.run(asset, deadline).await.report
    }

    #[instrument(skip(self, deadline), name = "analysis")]
    pub async fn run(&self, asset: &str, deadline: Instant) -> AnalysisOutcome {
        let mut stage = AnalysisStage::Fetching;

        let result = self.pipeline(asset, deadline, &mut stage).await;

        let outcome = match result {
            Ok(report) => {
                info!(asset = %asset, signals = report.signals.len(), "analysis assembled");
                AnalysisOutcome {
                    final_stage: AnalysisStage::Assembled,
                    failed_at: None,
                    failure: None,
                    report,
                }
            }
            Err(err) => {
                warn!(
                    asset = %asset,
                    stage = %stage,
                    error = %err,
                    "analysis failed, returning fallback report"
                );
                AnalysisOutcome {
                    final_stage: AnalysisStage::Failed,
                    failed_at: Some(stage),
                    failure: Some(err),
                    report: AnalysisReport::fallback(asset),
                }
            }
        };

        self.stats.record(asset, &outcome);
        outcome
    }

    async fn pipeline(
        &self,
        asset: &str,
        deadline: Instant,
        stage: &mut AnalysisStage,
    ) -> Result<AnalysisReport, AnalysisError> {
        // --- Fetching -------------------------------------------------------
        enter(stage, AnalysisStage::Fetching, asset);
        let history = self.fetch_history(asset, deadline).await?;

        if history.prices.len() < self.settings.min_samples {
            return Err(AnalysisError::InsufficientData {
                required: self.settings.min_samples,
                available: history.prices.len(),
            });
        }

        // --- Computing ------------------------------------------------------
        enter(stage, AnalysisStage::Computing, asset);
        let HistoricalSeries {
            prices,
            volumes,
            price_change_24h,
        } = history;
        let series = PriceSeries::new(prices, volumes)?;
        let bundle = IndicatorBundle::compute(&series, price_change_24h);
        let signals = SignalGenerator::generate(&bundle);
        let price_targets = ProjectionEngine::project(bundle.current_price, bundle.volatility);

        // --- EnrichingSentiment ---------------------------------------------
        enter(stage, AnalysisStage::EnrichingSentiment, asset);
        let news = self.fetch_news(asset, deadline).await?;
        let sentiment = self.sentiment.aggregate(asset, &news);

        // --- GeneratingNarrative --------------------------------------------
        enter(stage, AnalysisStage::GeneratingNarrative, asset);
        let prompt = build_prompt(
            asset,
            &bundle,
            &price_targets,
            &sentiment,
            &news,
            self.settings.headline_count,
        );
        let narrative = match timeout_at(deadline, self.narrator.generate(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => return Err(AnalysisError::NarrativeGeneration(err.to_string())),
            Err(_) => {
                return Err(AnalysisError::DeadlineExceeded {
                    stage: AnalysisStage::GeneratingNarrative.as_str(),
                })
            }
        };

        // --- Assembled ------------------------------------------------------
        enter(stage, AnalysisStage::Assembled, asset);
        let now = Utc::now();
        Ok(AnalysisReport {
            asset: asset.to_string(),
            generated_at: now.to_rfc3339(),
            summary: market_summary(asset, &bundle, now.date_naive()),
            narrative,
            price_targets,
            signals,
            strategy: recommend_strategy(&bundle),
            market_structure: MarketStructure {
                trend: bundle.market_phase.to_string(),
            },
        })
    }

    async fn fetch_history(
        &self,
        asset: &str,
        deadline: Instant,
    ) -> Result<HistoricalSeries, AnalysisError> {
        let days = self.settings.history_days;
        self.with_retry("history", AnalysisStage::Fetching, deadline, || {
            self.history.get(asset, days)
        })
        .await
    }

    async fn fetch_news(
        &self,
        asset: &str,
        deadline: Instant,
    ) -> Result<Vec<NewsItem>, AnalysisError> {
        self.with_retry("news", AnalysisStage::EnrichingSentiment, deadline, || {
            self.news.get(asset)
        })
        .await
    }

    /// Run `call` until it succeeds, attempts run out or the deadline passes.
    async fn with_retry<T, F, Fut>(
        &self,
        source_name: &'static str,
        stage: AnalysisStage,
        deadline: Instant,
        mut call: F,
    ) -> Result<T, AnalysisError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = self.settings.fetch_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match timeout_at(deadline, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => err,
                Err(_) => {
                    return Err(AnalysisError::DeadlineExceeded {
                        stage: stage.as_str(),
                    })
                }
            };

            // An unknown asset will not appear on retry.
            let retryable = !matches!(
                err,
                ProviderError::DataUnavailable(_) | ProviderError::NotConfigured(_)
            );
            if !retryable || attempt >= attempts {
                return Err(AnalysisError::upstream(source_name, err));
            }

            let resume_at = Instant::now().checked_add(self.settings.retry_backoff);
            if !resume_at.is_some_and(|t| t < deadline) {
                warn!(
                    source = source_name,
                    error = %err,
                    "backoff would overrun the deadline, giving up"
                );
                return Err(AnalysisError::DeadlineExceeded {
                    stage: stage.as_str(),
                });
            }

            warn!(
                source = source_name,
                attempt,
                attempts,
                error = %err,
                "fetch failed, retrying"
            );
            tokio::time::sleep(self.settings.retry_backoff).await;
            attempt += 1;
        }
    }
}

/// `now + timeout`, or a far-future instant when that overflows.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

fn enter(stage: &mut AnalysisStage, next: AnalysisStage, asset: &str) {
    debug!(asset = %asset, from = %stage, to = %next, "stage transition");
    *stage = next;
}

/// Long in a bull market, short otherwise. Entry at the 38.2% retracement
/// between support and resistance, stop 5% under support, target at
/// resistance.
pub fn recommend_strategy(bundle: &IndicatorBundle) -> StrategyRecommendation {
    let position = if bundle.market_phase == MarketPhase::BullMarket {
        Position::Long
    } else {
        Position::Short
    };
    let range = bundle.resistance - bundle.support;

    StrategyRecommendation {
        position,
        entry: Quote::Price(bundle.support + range * ENTRY_RETRACEMENT),
        stop: Quote::Price(bundle.support * (1.0 - STOP_BELOW_SUPPORT)),
        target: Quote::Price(bundle.resistance),
    }
}
