//! Configuration resolution
//!
//! Provider credentials come from one environment variable per provider.
//! An unset variable or the sentinel value `"mock"` both route the client to
//! the deterministic mock path, so local runs and CI need zero credentials.

use crate::types::ProviderKind;
use std::time::Duration;
use tracing::info;

/// Sentinel credential value routing a client to the mock path.
pub const MOCK_SENTINEL: &str = "mock";

/// Environment variable holding a provider's API key.
pub fn credential_env_var(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::ChatGpt => "OPENAI_API_KEY",
        ProviderKind::Claude => "ANTHROPIC_API_KEY",
        ProviderKind::Grok => "XAI_API_KEY",
    }
}

/// Resolve a provider credential from the environment.
///
/// Returns `None` for unset, blank, or sentinel values.
pub fn resolve_credential(kind: ProviderKind) -> Option<String> {
    let var = credential_env_var(kind);
    match std::env::var(var) {
        Ok(key) if is_usable_key(&key) => {
            info!(provider = %kind, source = var, "API key loaded from environment");
            Some(key)
        }
        _ => {
            info!(provider = %kind, "no API key configured, using mock evaluations");
            None
        }
    }
}

/// A key is usable if non-blank and not the mock sentinel.
pub fn is_usable_key(key: &str) -> bool {
    let trimmed = key.trim();
    !trimmed.is_empty() && trimmed != MOCK_SENTINEL
}

/// Retry/timeout tuning for the per-provider generation loop.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Attempts per provider before its slot degrades to `None`.
    pub max_attempts: u32,
    /// Ceiling each attempt races against.
    pub attempt_timeout: Duration,
    /// Base backoff; attempt N sleeps `retry_delay * N` (linear).
    pub retry_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(60),
            retry_delay: Duration::from_millis(2000),
        }
    }
}
