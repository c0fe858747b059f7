use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;

use crate::config::Config;

/// Output token budget for one analysis.
pub const DEFAULT_MAX_TOKENS: u32 = 400;
/// Ten minutes, the same ceiling the official OpenAI clients apply.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// A multimodal model that answers a text prompt about one image.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send `prompt` together with `base64_image` and return the model's
    /// text answer, exactly as produced.
    ///
    /// # Errors
    ///
    /// Any transport, HTTP or provider failure, or an empty answer.
    async fn analyze(&self, prompt: &str, base64_image: &str) -> anyhow::Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    http: reqwest::Client,
    pub base: String,
    pub token: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl OpenAiVisionClient {
    #[must_use]
    pub fn new(base: String, token: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            token,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_tokens: config.llm_max_tokens,
            timeout: Duration::from_secs(config.llm_timeout_secs),
            ..Self::new(
                config.llm_api_url.clone(),
                config.llm_api_key.clone(),
                config.llm_model.clone(),
            )
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base.trim_end_matches('/'))
    }

    /// The JSON body of one analysis request: a single user message holding
    /// the prompt and the inline image.
    #[must_use]
    pub fn request_body(&self, prompt: &str, base64_image: &str) -> JsonValue {
        json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_data_uri(base64_image) } }
                ]
            }],
            "max_tokens": self.max_tokens
        })
    }
}

/// Data URI for the uploaded image. Always tagged `image/png`, whatever the
/// upload's real format.
#[must_use]
pub fn image_data_uri(base64_image: &str) -> String {
    format!("data:image/png;base64,{base64_image}")
}

#[async_trait]
impl VisionModel for OpenAiVisionClient {
    async fn analyze(&self, prompt: &str, base64_image: &str) -> anyhow::Result<String> {
        let body = self.request_body(prompt, base64_image);

        let mut req = self
            .http
            .post(self.url())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(&body);

        if !self.token.trim().is_empty() {
            req = req.bearer_auth(&self.token);
        }

        tracing::debug!(model = %self.model, image_b64_len = base64_image.len(), "vision request");

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            anyhow::bail!("LLM HTTP {status}: {text}");
        }

        let envelope: JsonValue = serde_json::from_str(&text)?;
        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();

        if content.is_empty() {
            anyhow::bail!("OpenAI returned an empty response.");
        }

        tracing::debug!(chars = content.len(), "vision response");
        Ok(content.to_string())
    }
}
