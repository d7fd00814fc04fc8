//! Evaluation provider clients
//!
//! One client per vendor (OpenAI-, Anthropic-, xAI-compatible), all sharing
//! the [`ProviderClient`] contract. Real clients never surface an error to
//! the engine: with no credential configured they answer from the
//! deterministic mock generator, and any network/parse failure degrades to
//! the same mock result. The `Result` in the trait signature exists so test
//! doubles can exercise the engine's retry path.

pub mod anthropic;
pub mod mock;
pub mod openai;
pub mod payload;
pub mod xai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;
pub use xai::XaiClient;

use crate::config::resolve_credential;
use crate::error::ProviderError;
use crate::types::{EvaluationResult, ProviderKind};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Per-request generation temperature, shared by all vendors.
pub const GENERATION_TEMPERATURE: f64 = 0.7;
/// Max output token budget, shared by all vendors.
pub const MAX_OUTPUT_TOKENS: u32 = 16000;

/// HTTP timeouts for provider calls. The engine applies its own per-attempt
/// ceiling on top; this just keeps a wedged connection from outliving it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Contract every evaluation provider implements.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model identifier used in requests and in the persistence key.
    fn model(&self) -> &str;

    /// Versioning string for the upsert identity key:
    /// `{provider}-{model}-{YYYY-MM-DD}`.
    ///
    /// The embedded date means a rerun on a later day persists a new row
    /// instead of updating the prior day's. Kept for compatibility with the
    /// existing evaluation store.
    fn model_version(&self) -> String {
        format!(
            "{}-{}-{}",
            self.kind().as_str(),
            self.model(),
            Utc::now().format("%Y-%m-%d")
        )
    }

    /// Produce one evaluation for the prompt.
    async fn generate_evaluation(&self, prompt: &str) -> Result<EvaluationResult, ProviderError>;
}

/// Build the three production clients in fixed fan-out order, resolving each
/// credential from the environment.
pub fn default_providers() -> Vec<Arc<dyn ProviderClient>> {
    vec![
        Arc::new(OpenAiClient::new(resolve_credential(ProviderKind::ChatGpt))),
        Arc::new(AnthropicClient::new(resolve_credential(ProviderKind::Claude))),
        Arc::new(XaiClient::new(resolve_credential(ProviderKind::Grok))),
    ]
}

/// Shared `reqwest` client builder for provider calls.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_version_embeds_provider_model_and_date() {
        let client = OpenAiClient::new(None);
        let version = client.model_version();
        let today = Utc::now().format("%Y-%m-%d").to_string();
        assert!(version.starts_with("chatgpt-"));
        assert!(version.contains(client.model()));
        assert!(version.ends_with(&today), "version {version} missing date suffix");
    }

    #[test]
    fn default_providers_are_in_fixed_order() {
        let providers = default_providers();
        let kinds: Vec<ProviderKind> = providers.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, crate::types::PROVIDER_ORDER.to_vec());
    }
}
