//! Response payload handling shared by the provider clients
//!
//! Models routinely wrap their JSON in a markdown code fence despite the
//! output-format instruction. [`extract_json_payload`] strips one such fence;
//! [`normalize_evaluation`] maps the parsed value into the canonical result
//! shape, defaulting anything missing rather than failing. Strictness is the
//! validator's job, not this layer's.

use crate::types::{CriteriaSet, CriterionScore, EvaluationResult};
use serde_json::Value;

/// Strip a single leading/trailing markdown code fence (```json or ```).
///
/// Unfenced and malformed input comes back unchanged (minus outer
/// whitespace); this never fails.
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Opening fence may carry a language tag; drop through end of line.
    let body = match rest.strip_prefix("json") {
        Some(after_tag) => after_tag,
        None => rest,
    };
    let body = body.trim_start_matches(['\r', '\n']);

    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        // Unterminated fence: keep everything after the opener.
        None => body.trim(),
    }
}

/// Normalize a parsed provider response into the canonical result shape.
///
/// Missing or mistyped fields default to zero/empty. Never fails; a response
/// with nothing usable normalizes to an all-default result that the validator
/// then rejects.
pub fn normalize_evaluation(value: &Value) -> EvaluationResult {
    let criteria = value.get("criteria");
    EvaluationResult {
        overall_score: number_field(value, "overall_score"),
        overall_grade: string_field(value, "overall_grade"),
        criteria: CriteriaSet {
            integrity: criterion(criteria, "integrity"),
            expertise: criterion(criteria, "expertise"),
            communication: criterion(criteria, "communication"),
            leadership: criterion(criteria, "leadership"),
            transparency: criterion(criteria, "transparency"),
            responsiveness: criterion(criteria, "responsiveness"),
            innovation: criterion(criteria, "innovation"),
            collaboration: criterion(criteria, "collaboration"),
            constituency_service: criterion(criteria, "constituency_service"),
            policy_impact: criterion(criteria, "policy_impact"),
        },
        summary: string_field(value, "summary"),
        strengths: string_list(value, "strengths"),
        weaknesses: string_list(value, "weaknesses"),
        sources: string_list(value, "sources"),
    }
}

fn number_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn criterion(criteria: Option<&Value>, key: &str) -> CriterionScore {
    let entry = criteria.and_then(|c| c.get(key));
    CriterionScore {
        score: entry
            .and_then(|e| e.get("score"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        evidence: entry
            .and_then(|e| e.get("evidence"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passes_unfenced_json_through() {
        assert_eq!(extract_json_payload(r#"{"a":1}"#), r#"{"a":1}"#);
        assert_eq!(extract_json_payload("  {\"a\":1}\n"), r#"{"a":1}"#);
    }

    #[test]
    fn strips_json_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn tolerates_unterminated_fence() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn malformed_input_is_returned_trimmed() {
        assert_eq!(extract_json_payload("  not json at all  "), "not json at all");
        assert_eq!(extract_json_payload(""), "");
        assert_eq!(extract_json_payload("```"), "");
    }

    #[test]
    fn normalize_fills_missing_fields_with_defaults() {
        let result = normalize_evaluation(&json!({}));
        assert_eq!(result.overall_score, 0.0);
        assert!(result.overall_grade.is_empty());
        assert!(result.strengths.is_empty());
        assert_eq!(result.criteria.integrity.score, 0.0);
        assert!(result.criteria.integrity.evidence.is_empty());
    }

    #[test]
    fn normalize_maps_present_fields() {
        let value = json!({
            "overall_score": 87.5,
            "overall_grade": "B+",
            "summary": "요약",
            "strengths": ["a", 1, "b"],
            "weaknesses": [],
            "sources": ["https://x"],
            "criteria": {
                "integrity": { "score": 91, "evidence": "근거" }
            }
        });
        let result = normalize_evaluation(&value);
        assert_eq!(result.overall_score, 87.5);
        assert_eq!(result.overall_grade, "B+");
        // non-string array entries are skipped, not errors
        assert_eq!(result.strengths, vec!["a", "b"]);
        assert_eq!(result.criteria.integrity.score, 91.0);
        assert_eq!(result.criteria.integrity.evidence, "근거");
        // absent criteria default rather than fail
        assert_eq!(result.criteria.policy_impact.score, 0.0);
    }

    #[test]
    fn normalize_never_panics_on_scalars() {
        for v in [Value::Null, json!(3), json!("text"), json!([1, 2])] {
            let _ = normalize_evaluation(&v);
        }
    }
}
