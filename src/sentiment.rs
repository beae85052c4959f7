// =============================================================================
// Sentiment Aggregator — labelled headlines to a news score and market mood
// =============================================================================
//
//   news_score  = positive / total * 100
//   market_mood = Bullish if news_score > 60, Bearish if < 40, else Neutral
//
// The social score has no real data source. It is read through the
// `SocialScoreSource` capability, whose only implementation today returns a
// fixed neutral 50.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{NewsItem, NewsSentiment};

/// Neutral value for both scores.
pub const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketMood {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketMood {
    pub fn from_news_score(news_score: f64) -> Self {
        if news_score > 60.0 {
            Self::Bullish
        } else if news_score < 40.0 {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for MarketMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    /// Share of positive headlines, in [0, 100].
    pub news_score: f64,
    /// Placeholder social score, in [0, 100].
    pub social_score: f64,
    pub market_mood: MarketMood,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self {
            news_score: NEUTRAL_SCORE,
            social_score: NEUTRAL_SCORE,
            market_mood: MarketMood::Neutral,
        }
    }
}

/// Source of a social-media sentiment score for an asset.
pub trait SocialScoreSource: Send + Sync {
    fn social_score(&self, asset_id: &str) -> f64;
}

/// Stand-in used until a real social feed exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSocialScore;

impl SocialScoreSource for FixedSocialScore {
    fn social_score(&self, _asset_id: &str) -> f64 {
        NEUTRAL_SCORE
    }
}

#[derive(Clone)]
pub struct SentimentAggregator {
    social: Arc<dyn SocialScoreSource>,
}

impl SentimentAggregator {
    pub fn new(social: Arc<dyn SocialScoreSource>) -> Self {
        Self { social }
    }

    pub fn aggregate(&self, asset_id: &str, news: &[NewsItem]) -> Sentiment {
        if news.is_empty() {
            debug!(asset = asset_id, "no headlines; sentiment defaults to neutral");
            return Sentiment::neutral();
        }

        let positive = news
            .iter()
            .filter(|n| n.sentiment == NewsSentiment::Positive)
            .count();
        let news_score = positive as f64 / news.len() as f64 * 100.0;

        Sentiment {
            news_score,
            social_score: self.social.social_score(asset_id),
            market_mood: MarketMood::from_news_score(news_score),
        }
    }
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(Arc::new(FixedSocialScore))
    }
}
