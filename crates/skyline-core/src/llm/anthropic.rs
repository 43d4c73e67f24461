//! Anthropic Messages API endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::endpoint::{EndpointError, InferenceEndpoint, InferenceReply, InferenceRequest};
use super::sanitize::sanitize_error_body;
use crate::config::InferenceConfig;
use crate::error::{SkylineError, SkylineResult};

/// Endpoint backed by `POST {base_url}/v1/messages`
pub struct AnthropicEndpoint {
    base_url: String,
    api_key: String,
    api_version: String,
    http_client: Client,
}

impl AnthropicEndpoint {
    /// Create a new endpoint with an explicit client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            http_client,
        }
    }

    /// Build from configuration; requires an API key
    pub fn from_config(config: &InferenceConfig) -> SkylineResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SkylineError::config("Inference is enabled but no API key is set"))?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SkylineError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            &config.base_url,
            api_key,
            &config.api_version,
            http_client,
        ))
    }

    /// Concatenated text blocks of a Messages API response
    fn reply_text(body: &Value) -> String {
        body.get("content")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
                    .filter_map(|block| block.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceEndpoint for AnthropicEndpoint {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    #[instrument(skip(self, request), level = "debug")]
    async fn complete(&self, request: InferenceRequest) -> Result<InferenceReply, EndpointError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "messages": [
                {"role": "user", "content": request.prompt}
            ],
        });

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                EndpointError::Unavailable(format!("request {}: {}", kind, e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EndpointError::Rejected {
                status: status.as_u16(),
                message: sanitize_error_body(&text),
            });
        }

        let envelope: Value = response.json().await.map_err(|e| {
            EndpointError::Unavailable(format!("undecodable response: {}", e.without_url()))
        })?;

        let text = Self::reply_text(&envelope);
        debug!(reply_chars = text.len(), "Received inference reply");
        Ok(InferenceReply { text })
    }
}
