// =============================================================================
// External Collaborators
// =============================================================================
//
// The engine never talks to an upstream API directly. It depends on three
// traits over one normalised schema; each upstream gets its own adapter that
// maps its field names into that schema.
//
//   HistoricalDataProvider price / volume history      (coingecko.rs)
//   NewsProvider           labelled headlines          (newsdata.rs)
//   NarrativeGenerator     free text from a prompt     (gemini.rs)

pub mod coingecko;
pub mod gemini;
pub mod newsdata;

#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use coingecko::CoinGeckoHistory;
pub use gemini::GeminiNarrator;
pub use newsdata::NewsDataFeed;

// =============================================================================
// Normalised schema
// =============================================================================

/// Price / volume history for one asset, oldest sample first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
    /// Percent change over the last 24h.
    pub price_change_24h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
    Positive,
    Negative,
    Neutral,
}

impl NewsSentiment {
    /// Parse an upstream label. Anything unrecognised counts as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for NewsSentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub sentiment: NewsSentiment,
}

// =============================================================================
// Collaborator traits
// =============================================================================

#[async_trait]
pub trait HistoricalDataProvider: Send + Sync {
    /// Fetch `days` of daily history. Unknown assets fail with
    /// [`ProviderError::DataUnavailable`].
    async fn get(&self, asset_id: &str, days: u32) -> Result<HistoricalSeries, ProviderError>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Recent headlines about `asset_id`, most recent first.
    async fn get(&self, asset_id: &str) -> Result<Vec<NewsItem>, ProviderError>;
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Free text for `prompt`. The response has no required structure.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
