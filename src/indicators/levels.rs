// =============================================================================
// Support / Resistance from price quartiles
// =============================================================================
//
// support    = sorted[floor(n * 0.25)]
// resistance = sorted[floor(n * 0.75)]
//
// Both indices come from the same ascending sort, so support <= resistance.

use serde::{Deserialize, Serialize};

/// Minimum number of prices for a meaningful quartile split.
const MIN_PRICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceLevels {
    pub support: f64,
    pub resistance: f64,
}

/// Quartile-based support and resistance.
///
/// Returns `{0.0, 0.0}` for fewer than four prices.
pub fn support_resistance(prices: &[f64]) -> PriceLevels {
    let n = prices.len();
    if n < MIN_PRICES {
        return PriceLevels::default();
    }

    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = (n as f64 * 0.25).floor() as usize;
    let q3 = (n as f64 * 0.75).floor() as usize;

    PriceLevels {
        support: sorted[q1],
        resistance: sorted[q3],
    }
}
