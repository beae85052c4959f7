// =============================================================================
// Runtime Configuration — engine settings with atomic save
// =============================================================================
//
// Every tunable parameter of the analysis service lives here. Secrets (API
// keys) are NOT part of this file; they are read from the environment.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_history_days() -> u32 {
    200
}

fn default_min_samples() -> usize {
    200
}

fn default_analysis_timeout_secs() -> u64 {
    30
}

fn default_fetch_attempts() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_news_cache_ttl_minutes() -> u64 {
    5
}

fn default_news_page_size() -> u32 {
    10
}

fn default_headline_count() -> usize {
    3
}

fn default_coingecko_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_newsdata_base_url() -> String {
    "https://newsdata.io/api/1".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the Market Lens service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Server --------------------------------------------------------------

    /// Address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Analysis ------------------------------------------------------------

    /// Quote currency requested from the history provider.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// Days of daily history requested per run.
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// Minimum samples required before any indicator is computed. Matches
    /// the longest moving average (MA200).
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Deadline for a whole run, honoured at every external call.
    #[serde(default = "default_analysis_timeout_secs")]
    pub analysis_timeout_secs: u64,

    /// Attempts per fetch step (history, news). 1 means no retry.
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,

    /// Pause between fetch attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    // --- News ----------------------------------------------------------------

    #[serde(default = "default_news_cache_ttl_minutes")]
    pub news_cache_ttl_minutes: u64,

    #[serde(default = "default_news_page_size")]
    pub news_page_size: u32,

    /// Headlines embedded in the narrative prompt.
    #[serde(default = "default_headline_count")]
    pub headline_count: usize,

    // --- Upstreams -----------------------------------------------------------

    #[serde(default = "default_coingecko_base_url")]
    pub coingecko_base_url: String,

    #[serde(default = "default_newsdata_base_url")]
    pub newsdata_base_url: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            vs_currency: default_vs_currency(),
            history_days: default_history_days(),
            min_samples: default_min_samples(),
            analysis_timeout_secs: default_analysis_timeout_secs(),
            fetch_attempts: default_fetch_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            news_cache_ttl_minutes: default_news_cache_ttl_minutes(),
            news_page_size: default_news_page_size(),
            headline_count: default_headline_count(),
            coingecko_base_url: default_coingecko_base_url(),
            newsdata_base_url: default_newsdata_base_url(),
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            history_days = config.history_days,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
