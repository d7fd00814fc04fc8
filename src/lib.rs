//! poliscore library interface
//!
//! Multi-provider AI evaluation engine: prompt construction, three vendor
//! clients with deterministic mock fallback, schema validation, concurrent
//! retry/timeout orchestration with upsert persistence, and PDF report
//! rendering through a pooled headless browser.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod report;
pub mod types;
pub mod validator;

pub use crate::engine::{EvaluationEngine, ProviderOutcome, RunReport, SaveOutcome};
pub use crate::error::{EngineError, EngineResult, ProviderError, ReportError};
