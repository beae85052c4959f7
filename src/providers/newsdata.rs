// =============================================================================
// NewsData.io adapter — labelled headlines, cached with a TTL
// =============================================================================
//
// GET {base}/news?apikey=..&q=..&language=en&size=..
//
// Response:
//   { "status": "success", "results": [{ "title": "...", "sentiment": "positive" }] }
//
// Responses are cached per request (API key excluded from the key) so that
// repeated analyses of the same asset inside the TTL hit the network once.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{NewsItem, NewsProvider, NewsSentiment};
use crate::cache::TtlCache;
use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    sentiment: Option<String>,
}

pub struct NewsDataFeed {
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
    cache: Arc<TtlCache<Vec<NewsItem>>>,
    cache_ttl_minutes: u64,
    client: reqwest::Client,
}

impl NewsDataFeed {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        page_size: u32,
        cache: Arc<TtlCache<Vec<NewsItem>>>,
        cache_ttl_minutes: u64,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            page_size,
            cache,
            cache_ttl_minutes,
            client,
        })
    }

    fn cache_key(&self, asset_id: &str) -> String {
        format!(
            "{}/news?q={}&language=en&size={}",
            self.base_url, asset_id, self.page_size
        )
    }
}

#[async_trait]
impl NewsProvider for NewsDataFeed {
    #[instrument(skip(self), name = "newsdata::news")]
    async fn get(&self, asset_id: &str) -> Result<Vec<NewsItem>, ProviderError> {
        let key = self.cache_key(asset_id);
        if let Some(items) = self.cache.get(&key) {
            debug!(asset = asset_id, count = items.len(), "news served from cache");
            return Ok(items);
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("NEWSDATA_API_KEY is not set".into()))?;

        let size = self.page_size.to_string();
        let resp = self
            .client
            .get(format!("{}/news", self.base_url))
            .query(&[
                ("apikey", api_key),
                ("q", asset_id),
                ("language", "en"),
                ("size", size.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "NewsData returned {status}"
            )));
        }

        let body: NewsResponse = resp.json().await?;
        let items = normalize(body);

        self.cache.put(key, items.clone(), self.cache_ttl_minutes);
        debug!(asset = asset_id, count = items.len(), "news retrieved");
        Ok(items)
    }
}

fn normalize(body: NewsResponse) -> Vec<NewsItem> {
    body.results
        .into_iter()
        .filter_map(|a| {
            let title = a.title?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(NewsItem {
                title,
                sentiment: a
                    .sentiment
                    .as_deref()
                    .map(NewsSentiment::from_label)
                    .unwrap_or(NewsSentiment::Neutral),
            })
        })
        .collect()
}
