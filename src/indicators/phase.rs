// =============================================================================
// Market Phase Classifier
// =============================================================================
//
// Classifies the market from three booleans:
//
//   above_ma50  = price > MA50
//   above_ma200 = price > MA200
//   golden      = MA50  > MA200
//
// Decision table (evaluated top-to-bottom; first match wins):
//
//   1. BULL MARKET : all three true
//   2. BEAR MARKET : all three false
//   3. CORRECTION  : above MA200 but not above MA50
//   4. ACCUMULATION: everything else
//
// The final arm makes the table exhaustive over all 8 combinations.

use serde::{Deserialize, Serialize};

/// Coarse trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketPhase {
    #[serde(rename = "Bull Market")]
    BullMarket,
    #[serde(rename = "Bear Market")]
    BearMarket,
    Correction,
    Accumulation,
}

impl std::fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BullMarket => write!(f, "Bull Market"),
            Self::BearMarket => write!(f, "Bear Market"),
            Self::Correction => write!(f, "Correction"),
            Self::Accumulation => write!(f, "Accumulation"),
        }
    }
}

/// Classify the phase from the latest price and its 50/200 moving averages.
pub fn determine_market_phase(price: f64, ma50: f64, ma200: f64) -> MarketPhase {
    classify(price > ma50, price > ma200, ma50 > ma200)
}

fn classify(above_ma50: bool, above_ma200: bool, golden: bool) -> MarketPhase {
    match (above_ma50, above_ma200, golden) {
        (true, true, true) => MarketPhase::BullMarket,
        (false, false, false) => MarketPhase::BearMarket,
        (false, true, _) => MarketPhase::Correction,
        _ => MarketPhase::Accumulation,
    }
}
