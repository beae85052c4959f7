// =============================================================================
// Signal Generator — indicator readings to labelled, strength-scored signals
// =============================================================================
//
// Strength is a normalised distance from each indicator's neutral point:
//
//   RSI       |50 - rsi| / 50
//   MACD      |macd / price|          (0 when the MACD line is 0)
//   StochRSI  |50 - stoch_rsi| / 50
//   OBV       volume_ratio - 1        (unbounded, may be negative)
//
// Importance buckets: > 0.7 high, > 0.4 medium, else low.

use serde::{Deserialize, Serialize};

use crate::indicators::rsi::{interpret_rsi, interpret_stoch_rsi};
use crate::indicators::IndicatorBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn from_strength(strength: f64) -> Self {
        if strength > 0.7 {
            Self::High
        } else if strength > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A single labelled indicator reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub indicator: String,
    pub value: f64,
    pub interpretation: String,
    /// `"{indicator}: {interpretation}"`, as shown to readers.
    pub text: String,
    pub strength: f64,
    pub importance: Importance,
}

impl Signal {
    pub fn new(
        indicator: impl Into<String>,
        value: f64,
        interpretation: impl Into<String>,
        strength: f64,
    ) -> Self {
        let indicator = indicator.into();
        let interpretation = interpretation.into();
        Self {
            text: format!("{indicator}: {interpretation}"),
            indicator,
            value,
            interpretation,
            strength,
            importance: Importance::from_strength(strength),
        }
    }
}

pub struct SignalGenerator;

impl SignalGenerator {
    /// Signals in report order: RSI, MACD, StochRSI, OBV.
    pub fn generate(bundle: &IndicatorBundle) -> Vec<Signal> {
        let macd_strength = if bundle.macd.value != 0.0 {
            (bundle.macd.value / bundle.current_price).abs()
        } else {
            0.0
        };

        vec![
            Signal::new(
                "RSI",
                bundle.rsi,
                interpret_rsi(bundle.rsi),
                oscillator_strength(bundle.rsi),
            ),
            Signal::new(
                "MACD",
                bundle.macd.value,
                bundle.macd.interpretation.clone(),
                macd_strength,
            ),
            Signal::new(
                "StochRSI",
                bundle.stoch_rsi,
                interpret_stoch_rsi(bundle.stoch_rsi),
                oscillator_strength(bundle.stoch_rsi),
            ),
            Signal::new(
                "OBV",
                bundle.volume_change,
                bundle.obv_trend.to_string(),
                bundle.volume_change - 1.0,
            ),
        ]
    }
}

fn oscillator_strength(value: f64) -> f64 {
    (50.0 - value).abs() / 50.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::macd::MacdReading;
    use crate::indicators::volume::ObvTrend;
    use crate::indicators::MarketPhase;

    fn bundle() -> IndicatorBundle {
        IndicatorBundle {
            current_price: 200.0,
            price_change_24h: 0.0,
            rsi: 90.0,
            macd: MacdReading {
                value: 4.0,
                signal: 4.0,
                histogram: 0.0,
                interpretation: "Neutral or fading momentum (upward trend)".into(),
            },
            stoch_rsi: 25.0,
            ma20: 0.0,
            ma50: 0.0,
            ma200: 0.0,
            volume_change: 2.5,
            obv_trend: ObvTrend::Bullish,
            market_phase: MarketPhase::BullMarket,
            volatility: 10.0,
            support: 0.0,
            resistance: 0.0,
        }
    }

    #[test]
    fn signals_in_fixed_order() {
        let signals = SignalGenerator::generate(&bundle());
        let names: Vec<&str> = signals.iter().map(|s| s.indicator.as_str()).collect();
        assert_eq!(names, vec!["RSI", "MACD", "StochRSI", "OBV"]);
    }

    #[test]
    fn strengths_and_importance() {
        let signals = SignalGenerator::generate(&bundle());

        // RSI: |50 - 90| / 50 = 0.8
        assert!((signals[0].strength - 0.8).abs() < 1e-12);
        assert_eq!(signals[0].importance, Importance::High);
        assert_eq!(signals[0].text, "RSI: Overbought - Consider taking profits");

        // MACD: |4 / 200| = 0.02
        assert!((signals[1].strength - 0.02).abs() < 1e-12);
        assert_eq!(signals[1].importance, Importance::Low);

        // StochRSI: |50 - 25| / 50 = 0.5
        assert!((signals[2].strength - 0.5).abs() < 1e-12);
        assert_eq!(signals[2].importance, Importance::Medium);
        assert_eq!(signals[2].interpretation, "Oversold");

        // OBV: 2.5 - 1 = 1.5, above 1 is allowed
        assert!((signals[3].strength - 1.5).abs() < 1e-12);
        assert_eq!(signals[3].importance, Importance::High);
        assert_eq!(signals[3].text, "OBV: Bullish");
    }

    #[test]
    fn zero_macd_has_zero_strength() {
        let mut b = bundle();
        b.macd.value = 0.0;
        assert_eq!(SignalGenerator::generate(&b)[1].strength, 0.0);
    }

    #[test]
    fn below_average_volume_gives_negative_obv_strength() {
        let mut b = bundle();
        b.volume_change = 0.5;
        let obv = &SignalGenerator::generate(&b)[3];
        assert!((obv.strength + 0.5).abs() < 1e-12);
        assert_eq!(obv.importance, Importance::Low);
    }

    #[test]
    fn text_is_serialised_with_the_signal() {
        let signals = SignalGenerator::generate(&bundle());
        let json = serde_json::to_value(&signals[1]).unwrap();
        assert_eq!(
            json["text"],
            "MACD: Neutral or fading momentum (upward trend)"
        );
        assert_eq!(json["importance"], "low");
    }

    #[test]
    fn importance_thresholds_are_exclusive() {
        assert_eq!(Importance::from_strength(0.7), Importance::Medium);
        assert_eq!(Importance::from_strength(0.4), Importance::Low);
        assert_eq!(Importance::from_strength(0.71), Importance::High);
    }
}
