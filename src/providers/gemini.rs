// =============================================================================
// Gemini adapter — narrative text from a prompt
// =============================================================================
//
// POST {base}/v1beta/models/{model}:generateContent?key=..
//   { "contents": [{ "parts": [{ "text": prompt }] }] }
//
// The narrative is the concatenated text parts of the first candidate.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::NarrativeGenerator;
use crate::error::ProviderError;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiNarrator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiNarrator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        // Generation is slow; the orchestrator deadline is the real bound.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl NarrativeGenerator for GeminiNarrator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()), name = "gemini::generate")]
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("GEMINI_API_KEY is not set".into()))?;

        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "Gemini generateContent returned {status}"
            )));
        }

        let decoded: GenerateResponse = resp.json().await?;
        let text = extract_text(decoded)?;
        debug!(chars = text.len(), "narrative generated");
        Ok(text)
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String, ProviderError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::Decode("response carried no text".into()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn extracts_and_joins_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "Bitcoin is " }, { "text": "trending." }], "role": "model" } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }"#;
        let resp: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_text(resp).unwrap(), "Bitcoin is trending.");
    }

    #[test]
    fn empty_response_is_an_error() {
        let resp: GenerateResponse = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
        assert!(matches!(extract_text(resp), Err(ProviderError::Decode(_))));

        let resp: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [{ "finishReason": "SAFETY" }] }"#).unwrap();
        assert!(extract_text(resp).is_err());
    }

    #[test]
    fn endpoint_includes_model() {
        let g = GeminiNarrator::new("https://generativelanguage.googleapis.com/", "gemini-2.5-flash", None)
            .unwrap();
        assert_eq!(
            g.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let g = GeminiNarrator::new("http://localhost", "m", None).unwrap();
        let err = g.generate("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
