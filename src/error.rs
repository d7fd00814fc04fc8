//! Error types for the evaluation engine

use thiserror::Error;

/// Engine-level errors.
///
/// Per-provider failures (timeout, malformed response, failed validation) are
/// not errors at this level; they degrade to a `None` slot in the run result.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Subject missing from the backing store; fatal for the whole run.
    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    /// Persistence-layer error (connection, query, row mapping)
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

/// Provider client errors.
///
/// Real clients absorb these internally and fall back to the mock result;
/// they surface only from test doubles exercising the retry path.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Report generation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Evidence too thin for a report (below the 1000-character floor)
    #[error("evaluation too thin for report generation")]
    InvalidEvaluation,

    #[error("browser error: {0}")]
    Browser(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
