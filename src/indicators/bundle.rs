// =============================================================================
// Indicator Bundle — one immutable snapshot per analysis run
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::types::PriceSeries;

use super::ema::calculate_sma;
use super::levels::support_resistance;
use super::macd::{calculate_macd, MacdReading};
use super::phase::{determine_market_phase, MarketPhase};
use super::rsi::{calculate_rsi, calculate_stoch_rsi};
use super::volatility::log_return_volatility;
use super::volume::{obv_trend, volume_ratio, ObvTrend};

pub const RSI_PERIOD: usize = 14;
pub const STOCH_RSI_PERIOD: usize = 14;
pub const VOLUME_RATIO_PERIOD: usize = 20;

/// Every indicator the report is built from, computed once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    pub current_price: f64,
    /// Percent change over the last 24h, as reported by the history provider.
    pub price_change_24h: f64,
    /// RSI(14), in [0, 100].
    pub rsi: f64,
    pub macd: MacdReading,
    /// Stochastic RSI(14), in [0, 100].
    pub stoch_rsi: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub ma200: f64,
    /// Latest volume over the 20-bar mean; 1.0 is average.
    pub volume_change: f64,
    pub obv_trend: ObvTrend,
    pub market_phase: MarketPhase,
    /// Annualised log-return volatility in percent.
    pub volatility: f64,
    pub support: f64,
    pub resistance: f64,
}

impl IndicatorBundle {
    /// Run every indicator over `series`.
    pub fn compute(series: &PriceSeries, price_change_24h: f64) -> Self {
        let prices = series.prices();
        let volumes = series.volumes();
        let current_price = series.latest_price();

        let ma20 = calculate_sma(prices, 20);
        let ma50 = calculate_sma(prices, 50);
        let ma200 = calculate_sma(prices, 200);
        let levels = support_resistance(prices);

        let bundle = Self {
            current_price,
            price_change_24h,
            rsi: calculate_rsi(prices, RSI_PERIOD),
            macd: calculate_macd(prices),
            stoch_rsi: calculate_stoch_rsi(prices, STOCH_RSI_PERIOD),
            ma20,
            ma50,
            ma200,
            volume_change: volume_ratio(volumes, VOLUME_RATIO_PERIOD),
            obv_trend: obv_trend(prices, volumes),
            market_phase: determine_market_phase(current_price, ma50, ma200),
            volatility: log_return_volatility(prices),
            support: levels.support,
            resistance: levels.resistance,
        };

        debug!(
            samples = prices.len(),
            rsi = bundle.rsi,
            macd = bundle.macd.value,
            stoch_rsi = bundle.stoch_rsi,
            volatility = bundle.volatility,
            phase = %bundle.market_phase,
            "indicator bundle computed"
        );

        bundle
    }
}
