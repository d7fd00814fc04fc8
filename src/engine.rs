//! Evaluation orchestration
//!
//! Stateless per-run orchestrator: fetch the subject, build the prompt once,
//! fan out to every provider concurrently with an independent retry/timeout
//! loop, validate each response, and upsert accepted results. One provider's
//! exhaustion never aborts the others; subject-not-found aborts the run.

use crate::config::EngineConfig;
use crate::db;
use crate::error::{EngineError, EngineResult};
use crate::metrics::AuxMetricsSource;
use crate::prompt::build_prompt;
use crate::providers::ProviderClient;
use crate::types::{
    EvaluationResult, NewsArticle, PersistedEvaluation, Pledge, ProviderKind, SubjectProfile,
};
use crate::validator::is_valid_result;
use chrono::Utc;
use futures::future::join_all;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

/// Auxiliary subject data (activities, pledges, news).
///
/// Currently backed by static placeholder content pending real feed
/// integration; injected so the swap is a composition-root change.
pub trait SubjectFeeds: Send + Sync {
    fn recent_activities(&self, subject_id: &str) -> Vec<String>;
    fn pledges(&self, subject_id: &str) -> Vec<Pledge>;
    fn news(&self, subject_id: &str) -> Vec<NewsArticle>;
}

/// Placeholder feed content used until real activity/pledge/news sources land.
#[derive(Debug, Default)]
pub struct StaticFeeds;

impl SubjectFeeds for StaticFeeds {
    fn recent_activities(&self, _subject_id: &str) -> Vec<String> {
        vec![
            "본회의 출석 및 표결 참여".to_string(),
            "상임위원회 법안 심사".to_string(),
            "지역구 주민 간담회 개최".to_string(),
        ]
    }

    fn pledges(&self, _subject_id: &str) -> Vec<Pledge> {
        vec![
            Pledge {
                title: "청년 일자리 확대".to_string(),
                description: "지역 청년 일자리 1만개 창출 지원".to_string(),
                status: "진행중".to_string(),
            },
            Pledge {
                title: "교통 인프라 개선".to_string(),
                description: "광역 교통망 확충 예산 확보".to_string(),
                status: "계획".to_string(),
            },
        ]
    }

    fn news(&self, _subject_id: &str) -> Vec<NewsArticle> {
        Vec::new()
    }
}

/// Outcome of one provider's slot in a generation run.
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider: ProviderKind,
    /// `None` after retry exhaustion (error, timeout, or failed validation).
    pub result: Option<EvaluationResult>,
}

/// Per-provider save outcome within [`RunReport`].
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub provider: ProviderKind,
    pub saved: bool,
    pub error: Option<String>,
}

/// Structured result of `generate_and_save_all`; always resolves except on
/// subject-not-found.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Strict AND: true only if every provider generated AND saved.
    pub success: bool,
    pub results: Vec<SaveOutcome>,
}

/// The evaluation engine. Holds only collaborator references; no state
/// survives between runs.
pub struct EvaluationEngine {
    db: SqlitePool,
    providers: Vec<Arc<dyn ProviderClient>>,
    feeds: Arc<dyn SubjectFeeds>,
    metrics: Arc<dyn AuxMetricsSource>,
    config: EngineConfig,
}

impl EvaluationEngine {
    pub fn new(
        db: SqlitePool,
        providers: Vec<Arc<dyn ProviderClient>>,
        feeds: Arc<dyn SubjectFeeds>,
        metrics: Arc<dyn AuxMetricsSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            db,
            providers,
            feeds,
            metrics,
            config,
        }
    }

    /// Assemble the subject snapshot; `None` (not an error) when the subject
    /// is absent from the store.
    pub async fn fetch_subject_data(
        &self,
        subject_id: &str,
    ) -> EngineResult<Option<SubjectProfile>> {
        let row = db::subjects::load_subject(&self.db, subject_id).await?;

        Ok(row.map(|row| SubjectProfile {
            recent_activities: self.feeds.recent_activities(subject_id),
            pledges: self.feeds.pledges(subject_id),
            news: self.feeds.news(subject_id),
            id: row.id,
            name: row.name,
            party: row.party,
            position: row.position,
            region: row.region,
            bio: row.bio,
        }))
    }

    /// Generate evaluations from every provider concurrently.
    ///
    /// Fails only when the subject is missing. Slots resolve in fixed
    /// provider order regardless of completion order; an exhausted provider
    /// yields `None` without disturbing its siblings.
    pub async fn generate_all_evaluations(
        &self,
        subject_id: &str,
    ) -> EngineResult<Vec<ProviderOutcome>> {
        let subject = self
            .fetch_subject_data(subject_id)
            .await?
            .ok_or_else(|| EngineError::SubjectNotFound(subject_id.to_string()))?;

        let prompt = build_prompt(&subject);
        info!(
            subject_id,
            subject = %subject.name,
            providers = self.providers.len(),
            "starting evaluation run"
        );

        let tasks = self
            .providers
            .iter()
            .map(|client| self.generate_with_retry(Arc::clone(client), &prompt));

        // join_all preserves input order, so outcomes line up with the
        // fixed provider order even when completions interleave.
        let results = join_all(tasks).await;

        Ok(self
            .providers
            .iter()
            .zip(results)
            .map(|(client, result)| ProviderOutcome {
                provider: client.kind(),
                result,
            })
            .collect())
    }

    /// One provider's retry loop: each attempt races a timeout; failures
    /// (error, timeout, invalid response) back off linearly before the next
    /// attempt. Returns `None` after exhaustion.
    async fn generate_with_retry(
        &self,
        client: Arc<dyn ProviderClient>,
        prompt: &str,
    ) -> Option<EvaluationResult> {
        let provider = client.kind();

        for attempt in 1..=self.config.max_attempts {
            let call = client.generate_evaluation(prompt);
            match tokio::time::timeout(self.config.attempt_timeout, call).await {
                Ok(Ok(result)) if is_valid_result(&result) => {
                    info!(%provider, attempt, "evaluation accepted");
                    return Some(result);
                }
                Ok(Ok(_)) => {
                    warn!(%provider, attempt, "evaluation failed schema validation");
                }
                Ok(Err(err)) => {
                    warn!(%provider, attempt, error = %err, "provider call failed");
                }
                Err(_) => {
                    warn!(
                        %provider,
                        attempt,
                        timeout_secs = self.config.attempt_timeout.as_secs(),
                        "provider call timed out"
                    );
                }
            }

            if attempt < self.config.max_attempts {
                let delay = self.config.retry_delay * attempt;
                tokio::time::sleep(delay).await;
            }
        }

        warn!(%provider, attempts = self.config.max_attempts, "retries exhausted, slot degrades to null");
        None
    }

    /// Persist one accepted result, upserting by (subject, model version).
    ///
    /// The auxiliary placeholder metrics are sampled here, at save time; they
    /// are not part of the validated result.
    pub async fn save_evaluation(
        &self,
        subject_id: &str,
        client: &dyn ProviderClient,
        result: &EvaluationResult,
    ) -> EngineResult<()> {
        let model_version = client.model_version();
        let persisted = PersistedEvaluation::new(
            subject_id.to_string(),
            model_version.clone(),
            Utc::now().date_naive(),
            result.clone(),
            self.metrics.sample(),
        );

        db::evaluations::upsert_evaluation(&self.db, &persisted).await?;

        info!(subject_id, %model_version, "evaluation persisted");
        Ok(())
    }

    /// Full run: generate from all providers, then save each non-null result.
    ///
    /// Always resolves with a structured report except on subject-not-found.
    /// Per-provider persistence failures are reported in their slot and never
    /// abort sibling saves.
    pub async fn generate_and_save_all(&self, subject_id: &str) -> EngineResult<RunReport> {
        let outcomes = self.generate_all_evaluations(subject_id).await?;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut success = true;

        for (client, outcome) in self.providers.iter().zip(outcomes) {
            match outcome.result {
                Some(result) => {
                    match self.save_evaluation(subject_id, client.as_ref(), &result).await {
                        Ok(()) => results.push(SaveOutcome {
                            provider: outcome.provider,
                            saved: true,
                            error: None,
                        }),
                        Err(err) => {
                            success = false;
                            warn!(provider = %outcome.provider, error = %err, "save failed");
                            results.push(SaveOutcome {
                                provider: outcome.provider,
                                saved: false,
                                error: Some(err.to_string()),
                            });
                        }
                    }
                }
                None => {
                    success = false;
                    results.push(SaveOutcome {
                        provider: outcome.provider,
                        saved: false,
                        error: Some("generation failed after retries".to_string()),
                    });
                }
            }
        }

        info!(subject_id, success, "evaluation run finished");
        Ok(RunReport { success, results })
    }
}
