// =============================================================================
// Relative Strength Index (RSI) and Stochastic RSI
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: Sum gains / losses over the first `period` deltas, then divide
//          once by `period` to seed the averages. A zero delta counts as a
//          gain.
// Step 2: Smooth each subsequent delta asymmetrically:
//            up-day:   avg_gain = (avg_gain * (period - 1) + delta) / period
//                      avg_loss = (avg_loss * (period - 1)) / period
//            down-day: avg_gain = (avg_gain * (period - 1)) / period
//                      avg_loss = (avg_loss * (period - 1) - delta) / period
// Step 3: RS  = avg_gain / avg_loss   (+inf when avg_loss == 0)
//          RSI = 100 - 100 / (1 + RS)
//
// Because a flat series has avg_loss == 0, its RSI is 100, not 50.
// A NaN result (e.g. from NaN input) is replaced by the neutral 50.
//
// Stochastic RSI rescales the latest RSI against the min / max of a rolling
// RSI series computed over sliding windows.
// =============================================================================

/// Neutral oscillator value returned whenever an RSI cannot be computed.
pub const NEUTRAL_OSCILLATOR: f64 = 50.0;

/// Compute the RSI of the whole `closes` slice using Wilder's smoothing.
///
/// Returns [`NEUTRAL_OSCILLATOR`] when `period == 0`, when fewer than
/// `period + 1` closes are available, or when the result is NaN.
pub fn calculate_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_OSCILLATOR;
    }

    let period_f = period as f64;

    // --- Seed ---------------------------------------------------------------
    let (gains, losses) = closes[..=period]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(g, l), d| {
            if d >= 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

    let mut avg_gain = gains / period_f;
    let mut avg_loss = losses / period_f;

    // --- Asymmetric smoothing -----------------------------------------------
    for w in closes[period..].windows(2) {
        let delta = w[1] - w[0];
        if delta >= 0.0 {
            avg_gain = (avg_gain * (period_f - 1.0) + delta) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0)) / period_f;
        } else {
            avg_gain = (avg_gain * (period_f - 1.0)) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0) - delta) / period_f;
        }
    }

    let rs = if avg_loss == 0.0 {
        f64::INFINITY
    } else {
        avg_gain / avg_loss
    };
    let rsi = 100.0 - 100.0 / (1.0 + rs);

    if rsi.is_nan() {
        NEUTRAL_OSCILLATOR
    } else {
        rsi
    }
}

/// Stochastic RSI of the latest window, in [0, 100].
///
/// A rolling RSI is computed over every window of `period + 1` closes (the
/// smallest window that yields `period` deltas). The latest value is then
/// normalised: `(last - min) / (max - min) * 100`.
///
/// Returns [`NEUTRAL_OSCILLATOR`] when fewer than `2 * period` closes are
/// available or when every rolling RSI is identical.
pub fn calculate_stoch_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period * 2 {
        return NEUTRAL_OSCILLATOR;
    }

    let rsi_values: Vec<f64> = closes
        .windows(period + 1)
        .map(|w| calculate_rsi(w, period))
        .collect();

    let Some(&last) = rsi_values.last() else {
        return NEUTRAL_OSCILLATOR;
    };
    let min = rsi_values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = rsi_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max - min == 0.0 {
        return NEUTRAL_OSCILLATOR;
    }
    (last - min) / (max - min) * 100.0
}

/// Human-readable label for an RSI value.
pub fn interpret_rsi(rsi: f64) -> &'static str {
    if rsi >= 70.0 {
        "Overbought - Consider taking profits"
    } else if rsi <= 30.0 {
        "Oversold - Potential buying opportunity"
    } else if rsi >= 60.0 {
        "Bullish momentum building"
    } else if rsi <= 40.0 {
        "Bearish pressure present"
    } else {
        "Neutral momentum"
    }
}

/// Human-readable label for a Stochastic RSI value.
pub fn interpret_stoch_rsi(stoch_rsi: f64) -> &'static str {
    if stoch_rsi > 80.0 {
        "Extremely overbought"
    } else if stoch_rsi > 60.0 {
        "Overbought"
    } else if stoch_rsi < 20.0 {
        "Extremely oversold"
    } else if stoch_rsi < 40.0 {
        "Oversold"
    } else {
        "Neutral"
    }
}
