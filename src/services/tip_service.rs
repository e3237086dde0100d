use crate::dto::quiz_dto::{TipPayload, TipResponse};
use crate::error::Result;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

const FALLBACK_TIPS: &[&str] = &[
    "Reread the lesson material and try the quiz again. Repetition builds retention.",
    "Focus on the questions you got wrong and look up their explanations before retrying.",
    "Break the topic into smaller pieces and practice each one before the next attempt.",
    "Take a short break, then review the lesson with fresh eyes before retrying the quiz.",
];

#[derive(Clone)]
pub struct TipService {
    client: Client,
    api_key: Option<String>,
    api_url: Option<String>,
}

impl TipService {
    pub fn new(api_key: Option<String>, api_url: Option<String>, client: Client) -> Self {
        Self {
            client,
            api_key,
            api_url,
        }
    }

    /// Returns a short study suggestion for a lesson topic. Falls back to a
    /// canned tip when no API is configured or the upstream call fails.
    pub async fn study_tip(&self, payload: &TipPayload) -> Result<TipResponse> {
        let (api_key, api_url) = match (&self.api_key, &self.api_url) {
            (Some(key), Some(url)) => (key, url),
            _ => return Ok(Self::fallback_tip(payload)),
        };

        let system_prompt = "You are a friendly programming tutor. Give one short, concrete study \
            tip (2-3 sentences) for a learner who just failed a quiz on the given topic. \
            Be encouraging and specific to the topic.";

        let ai_payload = serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": format!("Topic: {}", payload.title)}
            ],
            "temperature": 0.7,
            "max_tokens": 200
        });

        match self.chat(api_key, api_url, ai_payload).await {
            Ok(suggestion) => Ok(TipResponse { suggestion }),
            Err(e) => {
                tracing::warn!("Tip generation failed, using fallback: {:?}", e);
                Ok(Self::fallback_tip(payload))
            }
        }
    }

    async fn chat(&self, api_key: &str, api_url: &str, payload: JsonValue) -> Result<String> {
        let res = self
            .client
            .post(api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Tip API error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Invalid tip API response format").into())
    }

    fn fallback_tip(payload: &TipPayload) -> TipResponse {
        // Deterministic pick so the same topic gets a stable tip.
        let idx = payload
            .title
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_add(b as usize))
            % FALLBACK_TIPS.len();
        TipResponse {
            suggestion: FALLBACK_TIPS[idx].to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_tip_is_stable_per_topic() {
        let payload = TipPayload {
            title: "Rust ownership".to_string(),
        };
        let a = TipService::fallback_tip(&payload);
        let b = TipService::fallback_tip(&payload);
        assert_eq!(a.suggestion, b.suggestion);
    }

    #[tokio::test]
    async fn unconfigured_service_uses_fallback() {
        let service = TipService::new(None, None, Client::new());
        let payload = TipPayload {
            title: "Loops".to_string(),
        };
        let resp = service.study_tip(&payload).await.unwrap();
        assert!(FALLBACK_TIPS.contains(&resp.suggestion.as_str()));
    }
}
