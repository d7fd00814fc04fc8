//! Core domain types for the evaluation engine
//!
//! Subject profiles are read-only snapshots assembled per evaluation request;
//! evaluation results are immutable once validated. The persisted form is
//! keyed by (subject_id, model_version) and upserted by that natural key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three evaluation providers, in fixed fan-out order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    ChatGpt,
    Claude,
    Grok,
}

/// Fixed provider order: results of a generation run are always reported
/// in this order regardless of completion order.
pub const PROVIDER_ORDER: [ProviderKind; 3] =
    [ProviderKind::ChatGpt, ProviderKind::Claude, ProviderKind::Grok];

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::ChatGpt => "chatgpt",
            ProviderKind::Claude => "claude",
            ProviderKind::Grok => "grok",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Campaign pledge record attached to a subject profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pledge {
    pub title: String,
    pub description: String,
    pub status: String,
}

/// News article record attached to a subject profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// Politician evaluation input snapshot.
///
/// Assembled from the backing store plus the injected activity feeds on every
/// request; never persisted as a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub id: String,
    pub name: String,
    pub party: String,
    pub position: String,
    pub region: String,
    pub bio: String,
    pub recent_activities: Vec<String>,
    pub pledges: Vec<Pledge>,
    pub news: Vec<NewsArticle>,
}

/// A single scored criterion with its supporting evidence text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    pub evidence: String,
}

/// The ten fixed criterion keys, in prompt/report order.
pub const CRITERION_KEYS: [&str; 10] = [
    "integrity",
    "expertise",
    "communication",
    "leadership",
    "transparency",
    "responsiveness",
    "innovation",
    "collaboration",
    "constituency_service",
    "policy_impact",
];

/// Bilingual display label for a criterion key.
pub fn criterion_label(key: &str) -> &'static str {
    match key {
        "integrity" => "청렴성 (Integrity)",
        "expertise" => "전문성 (Expertise)",
        "communication" => "소통능력 (Communication)",
        "leadership" => "리더십 (Leadership)",
        "transparency" => "투명성 (Transparency)",
        "responsiveness" => "대응성 (Responsiveness)",
        "innovation" => "혁신성 (Innovation)",
        "collaboration" => "협치능력 (Collaboration)",
        "constituency_service" => "지역구활동 (Constituency Service)",
        "policy_impact" => "정책영향력 (Policy Impact)",
        _ => "기타 (Other)",
    }
}

/// Fully-populated set of the ten criteria. Partial sets are invalid by
/// definition; construction always supplies all ten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSet {
    pub integrity: CriterionScore,
    pub expertise: CriterionScore,
    pub communication: CriterionScore,
    pub leadership: CriterionScore,
    pub transparency: CriterionScore,
    pub responsiveness: CriterionScore,
    pub innovation: CriterionScore,
    pub collaboration: CriterionScore,
    pub constituency_service: CriterionScore,
    pub policy_impact: CriterionScore,
}

impl CriteriaSet {
    /// Criteria in fixed key order, paired with their keys.
    pub fn entries(&self) -> [(&'static str, &CriterionScore); 10] {
        [
            ("integrity", &self.integrity),
            ("expertise", &self.expertise),
            ("communication", &self.communication),
            ("leadership", &self.leadership),
            ("transparency", &self.transparency),
            ("responsiveness", &self.responsiveness),
            ("innovation", &self.innovation),
            ("collaboration", &self.collaboration),
            ("constituency_service", &self.constituency_service),
            ("policy_impact", &self.policy_impact),
        ]
    }

    /// Arithmetic mean of the ten criterion scores.
    pub fn mean_score(&self) -> f64 {
        let sum: f64 = self.entries().iter().map(|(_, c)| c.score).sum();
        sum / 10.0
    }
}

/// One provider's complete evaluation of a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub overall_score: f64,
    pub overall_grade: String,
    pub criteria: CriteriaSet,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub sources: Vec<String>,
}

/// Letter grade for an overall score, matching the grade set the prompt
/// instructs providers to use.
pub fn grade_for_score(score: f64) -> &'static str {
    if score >= 95.0 {
        "A+"
    } else if score >= 90.0 {
        "A"
    } else if score >= 85.0 {
        "B+"
    } else if score >= 80.0 {
        "B"
    } else if score >= 75.0 {
        "C+"
    } else if score >= 70.0 {
        "C"
    } else {
        "D"
    }
}

/// Auxiliary placeholder metrics synthesized at save time.
///
/// Not part of the validated evaluation result; purely cosmetic columns kept
/// for schema compatibility. Sourced from an injected [`crate::metrics::AuxMetricsSource`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuxiliaryMetrics {
    pub pledge_completion_rate: f64,
    pub activity_score: f64,
    pub controversy_score: f64,
    pub sentiment_score: f64,
}

/// Evaluation row as persisted, keyed by (subject_id, model_version).
#[derive(Debug, Clone)]
pub struct PersistedEvaluation {
    pub guid: Uuid,
    pub subject_id: String,
    pub model_version: String,
    pub evaluation_date: NaiveDate,
    pub result: EvaluationResult,
    pub metrics: AuxiliaryMetrics,
}

impl PersistedEvaluation {
    pub fn new(
        subject_id: String,
        model_version: String,
        evaluation_date: NaiveDate,
        result: EvaluationResult,
        metrics: AuxiliaryMetrics,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            subject_id,
            model_version,
            evaluation_date,
            result,
            metrics,
        }
    }
}

/// Read-only projection of a persisted evaluation used for trend rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub evaluation_date: NaiveDate,
    pub overall_score: f64,
    pub overall_grade: String,
}
