// =============================================================================
// Moving Averages (EMA / SMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The very first EMA value is the first raw close, NOT the SMA of the first
// `period` closes. Reports produced by earlier versions of the engine were
// computed with this seeding, so it is kept for compatibility.
// =============================================================================

/// Compute the EMA series for the given `closes` slice and look-back `period`.
///
/// Returns an empty `Vec` when the input is shorter than `period` or the
/// period is zero. Otherwise the output has exactly one value per input close.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }
    seeded_ema(closes, period)
}

/// EMA recursion without the minimum-length guard.
///
/// Used by the MACD signal line, which smooths a single-element sequence:
/// with first-value seeding that degenerates to the element itself.
pub(crate) fn seeded_ema(closes: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = closes.first() else {
        return Vec::new();
    };
    let multiplier = 2.0 / (period + 1) as f64;

    let mut result = Vec::with_capacity(closes.len());
    result.push(first);

    let mut prev_ema = first;
    for &close in &closes[1..] {
        let ema = (close - prev_ema) * multiplier + prev_ema;
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Mean of the last `period` closes.
///
/// Returns `0.0` (the "not enough data" sentinel) when fewer than `period`
/// closes are available or the period is zero.
pub fn calculate_sma(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period {
        return 0.0;
    }
    let window = &closes[closes.len() - period..];
    window.iter().sum::<f64>() / period as f64
}
