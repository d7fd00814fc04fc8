//! OpenAI-compatible evaluation client
//!
//! Chat-completions endpoint with system+user framing. This is the one
//! vendor with a structured JSON response-format flag; the fence-stripping in
//! `payload` still runs as a belt for older models.

use super::payload::{extract_json_payload, normalize_evaluation};
use super::{http_client, mock::mock_evaluation, ProviderClient, GENERATION_TEMPERATURE, MAX_OUTPUT_TOKENS};
use crate::error::ProviderError;
use crate::types::{EvaluationResult, ProviderKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str =
    "You are a rigorous, evidence-driven evaluator of politicians. \
     Respond with a single JSON object and nothing else.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// OpenAI-compatible provider client ("chatgpt" slot).
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
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
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
            response_format: ResponseFormat { format_type: "json_object" },
        };

        let response = self
            .http_client
            .post(API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ProviderError::Parse("empty choices array".to_string()))?;

        let value: serde_json::Value = serde_json::from_str(extract_json_payload(content))
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(normalize_evaluation(&value))
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ChatGpt
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_evaluation(&self, prompt: &str) -> Result<EvaluationResult, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!(provider = "chatgpt", "no credential, returning mock evaluation");
            return Ok(mock_evaluation(self.kind()));
        };

        match self.request_evaluation(api_key, prompt).await {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(provider = "chatgpt", error = %err, "provider call failed, falling back to mock");
                Ok(mock_evaluation(self.kind()))
            }
        }
    }
}
