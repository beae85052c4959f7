// =============================================================================
// Shared types used across the Market Lens engine
// =============================================================================

use serde::{Serialize, Serializer};

use crate::error::AnalysisError;
use crate::signals::Signal;

/// Placeholder rendered wherever the fallback report has no value.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// PriceSeries
// =============================================================================

/// Validated, time-ordered price / volume history (oldest first).
///
/// Guarantees at least one sample and strictly positive, finite prices.
/// Volumes are kept as a parallel column and may differ in length from the
/// prices; indicators that need both columns aligned check for themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    prices: Vec<f64>,
    volumes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>, volumes: Vec<f64>) -> Result<Self, AnalysisError> {
        if prices.is_empty() {
            return Err(AnalysisError::InvalidSeries("series has no samples".into()));
        }
        if let Some((idx, price)) = prices
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && **p > 0.0))
        {
            return Err(AnalysisError::InvalidSeries(format!(
                "price at index {idx} is not strictly positive: {price}"
            )));
        }
        Ok(Self { prices, volumes })
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    /// Most recent price. Never panics: the constructor rejects empty input.
    pub fn latest_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }
}

// =============================================================================
// Price targets
// =============================================================================

/// Projected price band for one horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetRange {
    Band { low: f64, high: f64 },
    Unavailable,
}

impl Serialize for TargetRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Band { low, high } => (low, high).serialize(serializer),
            Self::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl std::fmt::Display for TargetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Band { low, high } => write!(f, "${low:.2} - ${high:.2}"),
            Self::Unavailable => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizonTarget {
    pub range: TargetRange,
    pub confidence: f64,
}

impl HorizonTarget {
    pub fn unavailable() -> Self {
        Self {
            range: TargetRange::Unavailable,
            confidence: 0.0,
        }
    }
}

/// Forecasts for the three fixed horizons, always serialised in the order
/// `24H`, `7D`, `30D`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceTargets {
    #[serde(rename = "24H")]
    pub day: HorizonTarget,
    #[serde(rename = "7D")]
    pub week: HorizonTarget,
    #[serde(rename = "30D")]
    pub month: HorizonTarget,
}

impl PriceTargets {
    pub fn unavailable() -> Self {
        Self {
            day: HorizonTarget::unavailable(),
            week: HorizonTarget::unavailable(),
            month: HorizonTarget::unavailable(),
        }
    }

    /// Horizons in report order, with their labels.
    pub fn horizons(&self) -> [(&'static str, &HorizonTarget); 3] {
        [("24H", &self.day), ("7D", &self.week), ("30D", &self.month)]
    }
}

// =============================================================================
// Strategy
// =============================================================================

/// A price level that the fallback report renders as `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quote {
    Price(f64),
    Unavailable,
}

impl Serialize for Quote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Price(p) => serializer.serialize_f64(*p),
            Self::Unavailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Price(p) => write!(f, "{p:.2}"),
            Self::Unavailable => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Position {
    Long,
    Short,
    #[serde(rename = "N/A")]
    Unavailable,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "Long"),
            Self::Short => write!(f, "Short"),
            Self::Unavailable => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyRecommendation {
    pub position: Position,
    pub entry: Quote,
    pub stop: Quote,
    pub target: Quote,
}

impl StrategyRecommendation {
    pub fn unavailable() -> Self {
        Self {
            position: Position::Unavailable,
            entry: Quote::Unavailable,
            stop: Quote::Unavailable,
            target: Quote::Unavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStructure {
    pub trend: String,
}

// =============================================================================
// AnalysisReport
// =============================================================================

pub const FALLBACK_SUMMARY: &str = "Market analysis unavailable.";
pub const FALLBACK_NARRATIVE: &str = "Failed to fetch market analysis.";

/// The one externally visible output of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub asset: String,
    /// ISO 8601 timestamp of when this report was assembled.
    pub generated_at: String,
    pub summary: String,
    pub narrative: String,
    pub price_targets: PriceTargets,
    pub signals: Vec<Signal>,
    pub strategy: StrategyRecommendation,
    pub market_structure: MarketStructure,
}

impl AnalysisReport {
    /// The fixed report returned whenever any stage of a run fails.
    pub fn fallback(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: FALLBACK_SUMMARY.to_string(),
            narrative: FALLBACK_NARRATIVE.to_string(),
            price_targets: PriceTargets::unavailable(),
            signals: Vec::new(),
            strategy: StrategyRecommendation::unavailable(),
            market_structure: MarketStructure {
                trend: NOT_AVAILABLE.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.summary == FALLBACK_SUMMARY && self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_series_rejects_empty_and_non_positive() {
        assert!(PriceSeries::new(vec![], vec![]).is_err());
        assert!(PriceSeries::new(vec![1.0, 0.0], vec![1.0, 1.0]).is_err());
        assert!(PriceSeries::new(vec![1.0, -2.0], vec![1.0, 1.0]).is_err());
        assert!(PriceSeries::new(vec![1.0, f64::NAN], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn price_series_accessors() {
        let series = PriceSeries::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0]).unwrap();
        assert_eq!(series.prices().len(), 3);
        assert_eq!(series.latest_price(), 3.0);
        assert_eq!(series.volumes(), &[10.0, 20.0]);
    }

    #[test]
    fn fallback_report_serialises_na_fields() {
        let report = AnalysisReport::fallback("bitcoin");
        assert!(report.is_fallback());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"], "Market analysis unavailable.");
        assert_eq!(json["narrative"], "Failed to fetch market analysis.");
        for horizon in ["24H", "7D", "30D"] {
            assert_eq!(json["priceTargets"][horizon]["range"], "N/A");
            assert_eq!(json["priceTargets"][horizon]["confidence"], 0.0);
        }
        assert_eq!(json["strategy"]["position"], "N/A");
        assert_eq!(json["strategy"]["entry"], "N/A");
        assert_eq!(json["strategy"]["stop"], "N/A");
        assert_eq!(json["strategy"]["target"], "N/A");
        assert_eq!(json["marketStructure"]["trend"], "N/A");
        assert!(json["signals"].as_array().unwrap().is_empty());
    }

    #[test]
    fn horizons_keep_report_order() {
        let targets = PriceTargets::unavailable();
        let labels: Vec<&str> = targets.horizons().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["24H", "7D", "30D"]);

        let json = serde_json::to_string(&targets).unwrap();
        let d = json.find("24H").unwrap();
        let w = json.find("7D").unwrap();
        let m = json.find("30D").unwrap();
        assert!(d < w && w < m);
    }

    #[test]
    fn target_range_display() {
        let band = TargetRange::Band { low: 90.0, high: 110.5 };
        assert_eq!(band.to_string(), "$90.00 - $110.50");
        assert_eq!(TargetRange::Unavailable.to_string(), "N/A");
    }
}
