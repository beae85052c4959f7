// =============================================================================
// CoinGecko adapter — daily price / volume history
// =============================================================================
//
// GET {base}/coins/{id}/market_chart?vs_currency=..&days=..&interval=daily
//
// Response:
//   { "prices": [[ts_ms, price], ...], "total_volumes": [[ts_ms, volume], ...] }
//
// The 24h change is derived from the last two daily closes.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{HistoricalDataProvider, HistoricalSeries};
use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<[f64; 2]>,
    #[serde(default)]
    total_volumes: Vec<[f64; 2]>,
}

#[derive(Clone)]
pub struct CoinGeckoHistory {
    base_url: String,
    vs_currency: String,
    client: reqwest::Client,
}

impl CoinGeckoHistory {
    pub fn new(
        base_url: impl Into<String>,
        vs_currency: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            vs_currency: vs_currency.into(),
            client,
        })
    }
}

#[async_trait]
impl HistoricalDataProvider for CoinGeckoHistory {
    #[instrument(skip(self), name = "coingecko::market_chart")]
    async fn get(&self, asset_id: &str, days: u32) -> Result<HistoricalSeries, ProviderError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset_id);
        let days = days.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", self.vs_currency.as_str()),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::DataUnavailable(format!(
                "unknown asset '{asset_id}'"
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "CoinGecko market_chart returned {status}"
            )));
        }

        let chart: MarketChart = resp.json().await?;
        let series = normalize(chart);
        debug!(asset = asset_id, samples = series.prices.len(), "history retrieved");
        Ok(series)
    }
}

fn normalize(chart: MarketChart) -> HistoricalSeries {
    let prices: Vec<f64> = chart.prices.iter().map(|p| p[1]).collect();
    let volumes: Vec<f64> = chart.total_volumes.iter().map(|v| v[1]).collect();

    let price_change_24h = match prices.as_slice() {
        [.., prev, last] if *prev != 0.0 => (last - prev) / prev * 100.0,
        _ => 0.0,
    };

    HistoricalSeries {
        prices,
        volumes,
        price_change_24h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_market_chart_payload() {
        let body = r#"{
            "prices": [[1700000000000, 100.0], [1700086400000, 110.0], [1700172800000, 99.0]],
            "market_caps": [[1700000000000, 1.0]],
            "total_volumes": [[1700000000000, 5.5], [1700086400000, 6.5], [1700172800000, 7.5]]
        }"#;
        let chart: MarketChart = serde_json::from_str(body).unwrap();
        let series = normalize(chart);

        assert_eq!(series.prices, vec![100.0, 110.0, 99.0]);
        assert_eq!(series.volumes, vec![5.5, 6.5, 7.5]);
        assert!((series.price_change_24h + 10.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_has_no_change() {
        let chart: MarketChart =
            serde_json::from_str(r#"{ "prices": [[1, 5.0]], "total_volumes": [] }"#).unwrap();
        let series = normalize(chart);
        assert_eq!(series.price_change_24h, 0.0);
        assert!(series.volumes.is_empty());
    }

    #[test]
    fn missing_arrays_decode_as_empty() {
        let chart: MarketChart = serde_json::from_str("{}").unwrap();
        assert_eq!(normalize(chart), HistoricalSeries::default());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = CoinGeckoHistory::new("https://api.coingecko.com/api/v3/", "usd").unwrap();
        assert_eq!(provider.base_url, "https://api.coingecko.com/api/v3");
    }
}
