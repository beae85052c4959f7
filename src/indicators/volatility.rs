// =============================================================================
// Log-return Volatility
// =============================================================================
//
//   r_t        = ln(p_t / p_{t-1})
//   volatility = stdev_sample(r) * sqrt(365) * 100
//
// Annualised on a 365-day calendar (crypto trades every day) and expressed as
// a percentage. Prices must be strictly positive; `PriceSeries` guarantees it
// for the orchestrated path.

/// Annualised volatility of `prices` in percent. Always `>= 0`.
///
/// Returns `0.0` for fewer than two prices, for a single return (the sample
/// deviation is undefined), or when the result is not finite.
pub fn log_return_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let volatility = variance.sqrt() * 365.0_f64.sqrt() * 100.0;

    if volatility.is_finite() {
        volatility
    } else {
        0.0
    }
}
