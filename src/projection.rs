// =============================================================================
// Projection Engine — multi-horizon price bands from volatility
// =============================================================================
//
//   base_confidence = round2(85 - volatility / 2)
//
//   horizon  multiplier  confidence
//   24H      0.1         base
//   7D       0.2         max(30, base * 0.9)
//   30D      0.3         max(30, base * 0.8)
//
//   band = price * (1 -/+ volatility * multiplier)
//
// `volatility` is in percent, so the bands widen quickly; a low bound can go
// negative for volatile assets. Base confidence is not floored and can be
// negative. The 30 floor would let a longer horizon out-score a shorter one
// once base < 30, so each horizon is capped at the previous horizon's value.

use tracing::debug;

use crate::types::{HorizonTarget, PriceTargets, TargetRange};

const CONFIDENCE_CEILING: f64 = 85.0;
const CONFIDENCE_FLOOR: f64 = 30.0;

pub struct ProjectionEngine;

impl ProjectionEngine {
    pub fn project(price: f64, volatility: f64) -> PriceTargets {
        let base = Self::base_confidence(volatility);

        let day_conf = base;
        let week_conf = (base * 0.9).max(CONFIDENCE_FLOOR).min(day_conf);
        let month_conf = (base * 0.8).max(CONFIDENCE_FLOOR).min(week_conf);

        let targets = PriceTargets {
            day: horizon(price, volatility, 0.1, day_conf),
            week: horizon(price, volatility, 0.2, week_conf),
            month: horizon(price, volatility, 0.3, month_conf),
        };

        debug!(price, volatility, base_confidence = base, "price targets projected");
        targets
    }

    pub fn base_confidence(volatility: f64) -> f64 {
        round2(CONFIDENCE_CEILING - volatility / 2.0)
    }
}

fn horizon(price: f64, volatility: f64, multiplier: f64, confidence: f64) -> HorizonTarget {
    HorizonTarget {
        range: TargetRange::Band {
            low: price * (1.0 - volatility * multiplier),
            high: price * (1.0 + volatility * multiplier),
        },
        confidence,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(target: &HorizonTarget) -> (f64, f64) {
        match target.range {
            TargetRange::Band { low, high } => (low, high),
            TargetRange::Unavailable => panic!("expected a band"),
        }
    }

    #[test]
    fn bands_and_confidence_for_low_volatility() {
        let t = ProjectionEngine::project(100.0, 0.5);

        let (low, high) = band(&t.day);
        assert!((low - 95.0).abs() < 1e-9);
        assert!((high - 105.0).abs() < 1e-9);
        let (low, high) = band(&t.month);
        assert!((low - 85.0).abs() < 1e-9);
        assert!((high - 115.0).abs() < 1e-9);

        assert!((t.day.confidence - 84.75).abs() < 1e-9);
        assert!((t.week.confidence - 84.75 * 0.9).abs() < 1e-9);
        assert!((t.month.confidence - 84.75 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn base_confidence_is_rounded_and_unclamped() {
        assert_eq!(ProjectionEngine::base_confidence(10.333), 79.83);
        assert_eq!(ProjectionEngine::base_confidence(200.0), -15.0);
    }

    #[test]
    fn floor_applies_to_longer_horizons() {
        // base = 35 => 7D = max(30, 31.5) = 31.5, 30D = max(30, 28) = 30
        let t = ProjectionEngine::project(10.0, 100.0);
        assert_eq!(t.day.confidence, 35.0);
        assert!((t.week.confidence - 31.5).abs() < 1e-9);
        assert_eq!(t.month.confidence, 30.0);
    }

    #[test]
    fn confidence_never_increases_with_horizon() {
        for step in 0..=400 {
            let vol = step as f64 * 0.75;
            let t = ProjectionEngine::project(250.0, vol);
            assert!(t.day.confidence >= t.week.confidence, "vol={vol}");
            assert!(t.week.confidence >= t.month.confidence, "vol={vol}");
        }
    }

    #[test]
    fn zero_volatility_collapses_bands() {
        let t = ProjectionEngine::project(42.0, 0.0);
        for (_, target) in t.horizons() {
            assert_eq!(band(target), (42.0, 42.0));
        }
        assert_eq!(t.day.confidence, 85.0);
    }
}
