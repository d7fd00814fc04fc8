//! Auxiliary metric synthesis
//!
//! The evaluation rows carry four placeholder columns (pledge completion,
//! activity, controversy, sentiment) that are not derived from the evaluation
//! itself. They sit behind a trait so real computations can replace the
//! random source without touching the orchestration logic.

use crate::types::AuxiliaryMetrics;
use rand::Rng;

/// Source of the auxiliary placeholder metrics sampled at save time.
pub trait AuxMetricsSource: Send + Sync {
    fn sample(&self) -> AuxiliaryMetrics;
}

/// Bounded random placeholder values, matching the column shape of the
/// original store.
#[derive(Debug, Default)]
pub struct RandomMetrics;

impl AuxMetricsSource for RandomMetrics {
    fn sample(&self) -> AuxiliaryMetrics {
        let mut rng = rand::thread_rng();
        AuxiliaryMetrics {
            pledge_completion_rate: rng.gen_range(30.0..90.0),
            activity_score: rng.gen_range(40.0..95.0),
            controversy_score: rng.gen_range(0.0..40.0),
            sentiment_score: rng.gen_range(30.0..80.0),
        }
    }
}

/// Fixed values for tests and deterministic runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics(pub AuxiliaryMetrics);

impl AuxMetricsSource for FixedMetrics {
    fn sample(&self) -> AuxiliaryMetrics {
        self.0
    }
}
