//! Evaluation response validation
//!
//! Total shape check over untrusted provider output. Any structural deviation
//! (wrong type, missing key, out-of-range score, short evidence) rejects the
//! whole object; there is no partial acceptance.
//!
//! The 100-character evidence floor is deliberately looser than the 3000
//! characters the prompt asks for, so mock and test data stay acceptable. The
//! report generator enforces its own stricter 1000-character floor.

use crate::types::{EvaluationResult, CRITERION_KEYS};
use serde_json::Value;

/// Minimum evidence length accepted at runtime.
pub const MIN_EVIDENCE_CHARS: usize = 100;

/// Check a parsed provider response against the expected ten-criterion schema.
///
/// Total over arbitrary JSON: null, arrays, and scalars all yield `false`.
pub fn is_valid_evaluation(candidate: &Value) -> bool {
    let Some(obj) = candidate.as_object() else {
        return false;
    };

    if !obj.get("overall_score").is_some_and(Value::is_number) {
        return false;
    }
    if !obj.get("overall_grade").is_some_and(Value::is_string) {
        return false;
    }
    if !obj.get("summary").is_some_and(Value::is_string) {
        return false;
    }
    for field in ["strengths", "weaknesses", "sources"] {
        if !obj.get(field).is_some_and(Value::is_array) {
            return false;
        }
    }

    let Some(criteria) = obj.get("criteria").and_then(Value::as_object) else {
        return false;
    };

    CRITERION_KEYS.iter().all(|key| {
        criteria
            .get(*key)
            .is_some_and(|c| is_valid_criterion(c))
    })
}

fn is_valid_criterion(criterion: &Value) -> bool {
    let Some(score) = criterion.get("score").and_then(Value::as_f64) else {
        return false;
    };
    if !(0.0..=100.0).contains(&score) {
        return false;
    }
    criterion
        .get("evidence")
        .and_then(Value::as_str)
        .is_some_and(|e| e.chars().count() >= MIN_EVIDENCE_CHARS)
}

/// Validate an already-normalized result by serializing it back to JSON.
pub fn is_valid_result(result: &EvaluationResult) -> bool {
    match serde_json::to_value(result) {
        Ok(value) => is_valid_evaluation(&value),
        Err(_) => false,
    }
}
