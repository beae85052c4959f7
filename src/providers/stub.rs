// In-memory collaborators for tests. Each counts its calls so tests can
// assert which stages of a run were reached.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{
    HistoricalDataProvider, HistoricalSeries, NarrativeGenerator, NewsItem, NewsProvider,
    NewsSentiment,
};
use crate::error::ProviderError;

/// `n` daily prices rising linearly from 100 to 200, constant volume.
pub fn rising_history(n: usize) -> HistoricalSeries {
    let step = if n > 1 { 100.0 / (n - 1) as f64 } else { 0.0 };
    HistoricalSeries {
        prices: (0..n).map(|i| 100.0 + i as f64 * step).collect(),
        volumes: vec![1_000.0; n],
        price_change_24h: 0.25,
    }
}

pub fn headlines() -> Vec<NewsItem> {
    vec![
        NewsItem {
            title: "ETF inflows hit record".into(),
            sentiment: NewsSentiment::Positive,
        },
        NewsItem {
            title: "Miners expand capacity".into(),
            sentiment: NewsSentiment::Positive,
        },
        NewsItem {
            title: "Regulator opens inquiry".into(),
            sentiment: NewsSentiment::Negative,
        },
        NewsItem {
            title: "Analysts split on outlook".into(),
            sentiment: NewsSentiment::Neutral,
        },
    ]
}

// =============================================================================
// History
// =============================================================================

pub struct StubHistory {
    result: Result<HistoricalSeries, ProviderError>,
    /// Calls that fail with a transport error before `result` is returned.
    failures_before_success: usize,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubHistory {
    pub fn ok(series: HistoricalSeries) -> Self {
        Self {
            result: Ok(series),
            failures_before_success: 0,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            result: Err(err),
            ..Self::ok(HistoricalSeries::default())
        }
    }

    pub fn flaky(series: HistoricalSeries, failures: usize) -> Self {
        Self {
            failures_before_success: failures,
            ..Self::ok(series)
        }
    }

    pub fn slow(series: HistoricalSeries, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok(series)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoricalDataProvider for StubHistory {
    async fn get(&self, _asset_id: &str, _days: u32) -> Result<HistoricalSeries, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if call < self.failures_before_success {
            return Err(ProviderError::Transport("connection reset".into()));
        }
        self.result.clone()
    }
}

// =============================================================================
// News
// =============================================================================

pub struct StubNews {
    result: Result<Vec<NewsItem>, ProviderError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubNews {
    pub fn ok(items: Vec<NewsItem>) -> Self {
        Self {
            result: Ok(items),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            result: Err(err),
            ..Self::ok(Vec::new())
        }
    }

    pub fn slow(items: Vec<NewsItem>, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok(items)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for StubNews {
    async fn get(&self, _asset_id: &str) -> Result<Vec<NewsItem>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

// =============================================================================
// Narrative
// =============================================================================

pub struct StubNarrator {
    result: Result<String, ProviderError>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl StubNarrator {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            result: Err(err),
            ..Self::ok("")
        }
    }

    pub fn slow(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok(text)
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl NarrativeGenerator for StubNarrator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}
