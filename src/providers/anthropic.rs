//! Anthropic-compatible evaluation client
//!
//! Messages endpoint with a single combined user message (this vendor gets
//! the full instruction inline rather than a separate system role). No
//! structured-output flag here, so fence stripping does real work.

use super::payload::{extract_json_payload, normalize_evaluation};
use super::{http_client, mock::mock_evaluation, ProviderClient, GENERATION_TEMPERATURE, MAX_OUTPUT_TOKENS};
use crate::error::ProviderError;
use crate::types::{EvaluationResult, ProviderKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Anthropic-compatible provider client ("claude" slot).
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http_client: http_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn request_evaluation(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<EvaluationResult, ProviderError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: GENERATION_TEMPERATURE,
            messages: vec![UserMessage { role: "user", content: prompt }],
        };

        let response = self
            .http_client
            .post(API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), body));
        }

        let messages: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let content = messages
            .content
            .first()
            .map(|b| b.text.as_str())
            .ok_or_else(|| ProviderError::Parse("empty content array".to_string()))?;

        let value: serde_json::Value = serde_json::from_str(extract_json_payload(content))
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(normalize_evaluation(&value))
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_evaluation(&self, prompt: &str) -> Result<EvaluationResult, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!(provider = "claude", "no credential, returning mock evaluation");
            return Ok(mock_evaluation(self.kind()));
        };

        match self.request_evaluation(api_key, prompt).await {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(provider = "claude", error = %err, "provider call failed, falling back to mock");
                Ok(mock_evaluation(self.kind()))
            }
        }
    }
}
