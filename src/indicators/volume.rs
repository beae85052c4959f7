// =============================================================================
// Volume Indicators — On-Balance Volume trend and volume ratio
// =============================================================================

use serde::{Deserialize, Serialize};

/// Number of trailing OBV values compared to label the trend.
const OBV_TREND_WINDOW: usize = 5;

/// Neutral ratio returned whenever the volume ratio cannot be computed.
pub const NEUTRAL_RATIO: f64 = 1.0;

/// Direction of cumulative volume flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObvTrend {
    Bullish,
    Bearish,
    /// Prices and volumes could not be aligned.
    Neutral,
}

impl std::fmt::Display for ObvTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Label the On-Balance-Volume trend.
///
/// OBV starts at 0 and adds the bar's volume on an up-tick, subtracts it on a
/// down-tick, and is unchanged on a flat tick. The trend is `Bullish` when the
/// last of the most recent five OBV values exceeds the first of them, else
/// `Bearish`.
///
/// Returns `Neutral` when `prices` and `volumes` differ in length or are
/// empty.
pub fn obv_trend(prices: &[f64], volumes: &[f64]) -> ObvTrend {
    if prices.len() != volumes.len() || prices.is_empty() {
        return ObvTrend::Neutral;
    }

    let mut obv = 0.0;
    let mut obv_values = Vec::with_capacity(prices.len());
    obv_values.push(obv);

    for (w, &volume) in prices.windows(2).zip(&volumes[1..]) {
        if w[1] > w[0] {
            obv += volume;
        } else if w[1] < w[0] {
            obv -= volume;
        }
        obv_values.push(obv);
    }

    let recent = &obv_values[obv_values.len().saturating_sub(OBV_TREND_WINDOW)..];
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if last > first => ObvTrend::Bullish,
        _ => ObvTrend::Bearish,
    }
}

/// Latest volume relative to the mean of the last `period` volumes.
///
/// `1.0` means "average". Returns [`NEUTRAL_RATIO`] when fewer than `period`
/// volumes are available or the mean is zero.
pub fn volume_ratio(volumes: &[f64], period: usize) -> f64 {
    if period == 0 || volumes.len() < period {
        return NEUTRAL_RATIO;
    }
    let current = volumes[volumes.len() - 1];
    let avg = volumes[volumes.len() - period..].iter().sum::<f64>() / period as f64;
    if avg == 0.0 {
        NEUTRAL_RATIO
    } else {
        current / avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_neutral() {
        assert_eq!(obv_trend(&[1.0, 2.0, 3.0], &[10.0, 10.0]), ObvTrend::Neutral);
        assert_eq!(obv_trend(&[], &[]), ObvTrend::Neutral);
    }

    #[test]
    fn rising_prices_are_bullish() {
        let prices: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let volumes = vec![100.0; 20];
        assert_eq!(obv_trend(&prices, &volumes), ObvTrend::Bullish);
    }

    #[test]
    fn falling_prices_are_bearish() {
        let prices: Vec<f64> = (1..=20).rev().map(|x| x as f64).collect();
        let volumes = vec![100.0; 20];
        assert_eq!(obv_trend(&prices, &volumes), ObvTrend::Bearish);
    }

    #[test]
    fn flat_tail_is_bearish() {
        // Only the last five OBV values matter; a flat tail has last == first.
        let mut prices: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        prices.extend([10.0; 5]);
        let volumes = vec![50.0; prices.len()];
        assert_eq!(obv_trend(&prices, &volumes), ObvTrend::Bearish);
    }

    #[test]
    fn single_bar_is_bearish() {
        assert_eq!(obv_trend(&[5.0], &[1.0]), ObvTrend::Bearish);
    }

    #[test]
    fn volume_ratio_basic() {
        let mut volumes = vec![100.0; 19];
        volumes.push(300.0);
        // mean of last 20 = (19 * 100 + 300) / 20 = 110
        assert!((volume_ratio(&volumes, 20) - 300.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn volume_ratio_sentinels() {
        assert_eq!(volume_ratio(&[1.0, 2.0], 20), NEUTRAL_RATIO);
        assert_eq!(volume_ratio(&[0.0; 25], 20), NEUTRAL_RATIO);
        assert_eq!(volume_ratio(&[5.0; 25], 0), NEUTRAL_RATIO);
    }
}
