// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(12) - EMA(26), taken at the latest close
//   Signal line = EMA(9) of the single-element sequence [MACD line]
//   Histogram   = MACD line - Signal line
//
// The signal line is NOT a 9-sample smoothing of a MACD history. With
// first-value EMA seeding, smoothing one element yields that element, so the
// signal line equals the MACD line and the histogram is zero. Downstream
// labels depend on this, so it is kept as is.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::{calculate_ema, seeded_ema};

/// Histogram / line-gap band treated as "no meaningful difference".
const TOLERANCE: f64 = 0.1;

/// Latest MACD reading plus its human-readable interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
    pub interpretation: String,
}

/// Compute the MACD reading for `closes`.
///
/// When there are fewer than 26 closes the MACD line is the `0.0` sentinel.
pub fn calculate_macd(closes: &[f64]) -> MacdReading {
    let ema12 = calculate_ema(closes, 12);
    let ema26 = calculate_ema(closes, 26);

    let macd_line = match (ema12.last(), ema26.last()) {
        (Some(fast), Some(slow)) => fast - slow,
        _ => 0.0,
    };
    let signal_line = seeded_ema(&[macd_line], 9)
        .last()
        .copied()
        .unwrap_or(macd_line);
    let histogram = macd_line - signal_line;

    MacdReading {
        value: macd_line,
        signal: signal_line,
        histogram,
        interpretation: interpret_macd(macd_line, signal_line, histogram),
    }
}

/// Label a MACD reading.
///
/// Base label from the histogram, then a trend qualifier when both lines
/// share a sign, then a reversal warning when the lines are within
/// [`TOLERANCE`] of each other.
pub fn interpret_macd(macd_line: f64, signal_line: f64, histogram: f64) -> String {
    let mut interpretation = if histogram > TOLERANCE {
        String::from("Bullish momentum")
    } else if histogram < -TOLERANCE {
        String::from("Bearish momentum")
    } else {
        String::from("Neutral or fading momentum")
    };

    if macd_line > 0.0 && signal_line > 0.0 {
        interpretation.push_str(" (upward trend)");
    } else if macd_line < 0.0 && signal_line < 0.0 {
        interpretation.push_str(" (downward trend)");
    }

    if (macd_line - signal_line).abs() < TOLERANCE {
        interpretation.push_str(", potential trend reversal");
    }

    interpretation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_line_equals_macd_line() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let macd = calculate_macd(&closes);
        assert_eq!(macd.value, macd.signal);
        assert_eq!(macd.histogram, 0.0);
    }

    #[test]
    fn rising_series_reports_upward_trend() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.5).collect();
        let macd = calculate_macd(&closes);
        assert!(macd.value > 0.0);
        assert_eq!(
            macd.interpretation,
            "Neutral or fading momentum (upward trend), potential trend reversal"
        );
    }

    #[test]
    fn falling_series_reports_downward_trend() {
        let closes: Vec<f64> = (0..200).map(|i| 300.0 - i as f64).collect();
        let macd = calculate_macd(&closes);
        assert!(macd.value < 0.0);
        assert!(macd.interpretation.contains("(downward trend)"));
    }

    #[test]
    fn short_series_uses_zero_sentinel() {
        let macd = calculate_macd(&[1.0, 2.0, 3.0]);
        assert_eq!(macd.value, 0.0);
        assert_eq!(
            macd.interpretation,
            "Neutral or fading momentum, potential trend reversal"
        );
    }

    #[test]
    fn interpretation_branches() {
        assert_eq!(interpret_macd(2.0, 1.0, 1.0), "Bullish momentum (upward trend)");
        assert_eq!(
            interpret_macd(-2.0, -1.0, -1.0),
            "Bearish momentum (downward trend)"
        );
        assert_eq!(interpret_macd(0.5, -0.5, 1.0), "Bullish momentum");
        assert_eq!(
            interpret_macd(1.0, 0.95, 0.05),
            "Neutral or fading momentum (upward trend), potential trend reversal"
        );
    }
}
