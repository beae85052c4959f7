// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind every
// analysis report. Nothing here returns an error: insufficient data and
// numerical edge cases resolve to fixed sentinel values (50 for oscillators,
// 0 for unscaled metrics, 1 for ratios) documented on each function.

pub mod bundle;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod phase;
pub mod rsi;
pub mod volatility;
pub mod volume;

pub use bundle::IndicatorBundle;
pub use phase::MarketPhase;
