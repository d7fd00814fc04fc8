//! Engine integration tests
//!
//! Run against file-backed temporary SQLite with no provider credentials, so
//! every client answers from the deterministic mock path.

use async_trait::async_trait;
use poliscore::config::EngineConfig;
use poliscore::db;
use poliscore::engine::{EvaluationEngine, StaticFeeds};
use poliscore::error::{EngineError, ProviderError};
use poliscore::metrics::RandomMetrics;
use poliscore::providers::{
    mock::mock_evaluation, AnthropicClient, OpenAiClient, ProviderClient, XaiClient,
};
use poliscore::types::{EvaluationResult, ProviderKind, PROVIDER_ORDER};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const GRADES: [&str; 7] = ["A+", "A", "B+", "B", "C+", "C", "D"];

async fn setup_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("create temp dir");
    let pool = db::init_database_pool(&dir.path().join("test.db"))
        .await
        .expect("init pool");
    (dir, pool)
}

async fn seed_subject(pool: &SqlitePool) {
    db::subjects::save_subject(
        pool,
        &db::subjects::SubjectRow {
            id: "pol-123".to_string(),
            name: "홍길동".to_string(),
            party: "무소속".to_string(),
            position: "국회의원".to_string(),
            region: "서울 종로구".to_string(),
            bio: "시민운동가 출신 3선 의원.".to_string(),
        },
    )
    .await
    .expect("seed subject");
}

fn test_config() -> EngineConfig {
    EngineConfig {
        max_attempts: 3,
        attempt_timeout: Duration::from_secs(5),
        retry_delay: Duration::ZERO,
    }
}

fn mock_providers() -> Vec<Arc<dyn ProviderClient>> {
    vec![
        Arc::new(OpenAiClient::new(None)),
        Arc::new(AnthropicClient::new(None)),
        Arc::new(XaiClient::new(None)),
    ]
}

fn engine_with(pool: SqlitePool, providers: Vec<Arc<dyn ProviderClient>>) -> EvaluationEngine {
    EvaluationEngine::new(
        pool,
        providers,
        Arc::new(StaticFeeds),
        Arc::new(RandomMetrics),
        test_config(),
    )
}

/// Test double that fails every attempt, exercising retry exhaustion.
struct AlwaysFailing;

#[async_trait]
impl ProviderClient for AlwaysFailing {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Grok
    }

    fn model(&self) -> &str {
        "always-failing"
    }

    async fn generate_evaluation(&self, _prompt: &str) -> Result<EvaluationResult, ProviderError> {
        Err(ProviderError::Network("connection refused".to_string()))
    }
}

/// Test double that never answers in time, exercising the timeout race.
struct NeverAnswers;

#[async_trait]
impl ProviderClient for NeverAnswers {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Grok
    }

    fn model(&self) -> &str {
        "never-answers"
    }

    async fn generate_evaluation(&self, _prompt: &str) -> Result<EvaluationResult, ProviderError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(mock_evaluation(ProviderKind::Grok))
    }
}

/// Test double whose responses are well-formed but fail schema validation
/// (all-default result: empty evidence, zero scores).
struct AlwaysInvalid;

#[async_trait]
impl ProviderClient for AlwaysInvalid {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Grok
    }

    fn model(&self) -> &str {
        "always-invalid"
    }

    async fn generate_evaluation(&self, _prompt: &str) -> Result<EvaluationResult, ProviderError> {
        Ok(EvaluationResult::default())
    }
}

/// Test double with a pinned model version, for upsert-key tests.
struct PinnedVersion {
    version: String,
    result: EvaluationResult,
}

#[async_trait]
impl ProviderClient for PinnedVersion {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ChatGpt
    }

    fn model(&self) -> &str {
        "pinned"
    }

    fn model_version(&self) -> String {
        self.version.clone()
    }

    async fn generate_evaluation(&self, _prompt: &str) -> Result<EvaluationResult, ProviderError> {
        Ok(self.result.clone())
    }
}

#[tokio::test]
async fn end_to_end_mock_run_yields_three_valid_results() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let engine = engine_with(pool, mock_providers());

    let outcomes = engine
        .generate_all_evaluations("pol-123")
        .await
        .expect("run should succeed");

    assert_eq!(outcomes.len(), 3);
    let kinds: Vec<ProviderKind> = outcomes.iter().map(|o| o.provider).collect();
    assert_eq!(kinds, PROVIDER_ORDER.to_vec());

    for outcome in &outcomes {
        let result = outcome
            .result
            .as_ref()
            .unwrap_or_else(|| panic!("{} slot is null", outcome.provider));
        assert!(GRADES.contains(&result.overall_grade.as_str()));
        let entries = result.criteria.entries();
        assert_eq!(entries.len(), 10);
        for (key, criterion) in entries {
            assert!(
                (0.0..=100.0).contains(&criterion.score),
                "{key} score out of range"
            );
            assert!(
                criterion.evidence.chars().count() >= 100,
                "{key} evidence too short"
            );
        }
    }
}

#[tokio::test]
async fn missing_subject_fails_the_whole_run() {
    let (_dir, pool) = setup_pool().await;
    let engine = engine_with(pool, mock_providers());

    let err = engine
        .generate_all_evaluations("does-not-exist")
        .await
        .expect_err("run must fail for an unknown subject");
    assert!(matches!(err, EngineError::SubjectNotFound(id) if id == "does-not-exist"));
}

#[tokio::test]
async fn fetch_subject_data_returns_none_not_error() {
    let (_dir, pool) = setup_pool().await;
    let engine = engine_with(pool, mock_providers());

    let subject = engine
        .fetch_subject_data("does-not-exist")
        .await
        .expect("lookup itself should succeed");
    assert!(subject.is_none());
}

#[tokio::test]
async fn one_exhausted_provider_does_not_abort_the_others() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        Arc::new(OpenAiClient::new(None)),
        Arc::new(AnthropicClient::new(None)),
        Arc::new(AlwaysFailing),
    ];
    let engine = engine_with(pool, providers);

    let outcomes = engine.generate_all_evaluations("pol-123").await.unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_some(), "chatgpt slot should survive");
    assert!(outcomes[1].result.is_some(), "claude slot should survive");
    assert!(outcomes[2].result.is_none(), "failing slot must be null");
}

#[tokio::test]
async fn timed_out_provider_degrades_to_null_without_blocking_siblings() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        Arc::new(OpenAiClient::new(None)),
        Arc::new(AnthropicClient::new(None)),
        Arc::new(NeverAnswers),
    ];
    let engine = EvaluationEngine::new(
        pool,
        providers,
        Arc::new(StaticFeeds),
        Arc::new(RandomMetrics),
        EngineConfig {
            max_attempts: 3,
            attempt_timeout: Duration::from_millis(50),
            retry_delay: Duration::ZERO,
        },
    );

    let outcomes = engine.generate_all_evaluations("pol-123").await.unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_some(), "chatgpt slot should survive");
    assert!(outcomes[1].result.is_some(), "claude slot should survive");
    assert!(
        outcomes[2].result.is_none(),
        "slot must be null after every attempt times out"
    );
}

#[tokio::test]
async fn invalid_response_is_retried_then_degrades_like_a_failure() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        Arc::new(OpenAiClient::new(None)),
        Arc::new(AnthropicClient::new(None)),
        Arc::new(AlwaysInvalid),
    ];
    let engine = engine_with(pool, providers);

    let outcomes = engine.generate_all_evaluations("pol-123").await.unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_some());
    assert!(outcomes[1].result.is_some());
    // a well-formed but schema-invalid response exhausts retries exactly
    // like a transport error: the slot is null, nothing distinguishes them
    assert!(outcomes[2].result.is_none());
}

#[tokio::test]
async fn save_twice_with_same_version_keeps_one_row_second_wins() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let engine = engine_with(pool.clone(), mock_providers());

    let version = "chatgpt-pinned-2024-01-01".to_string();
    let first = PinnedVersion {
        version: version.clone(),
        result: mock_evaluation(ProviderKind::ChatGpt),
    };
    engine
        .save_evaluation("pol-123", &first, &first.result)
        .await
        .unwrap();

    let mut updated = mock_evaluation(ProviderKind::ChatGpt);
    updated.summary = "두 번째 평가 요약".to_string();
    updated.overall_score = 91.0;
    let second = PinnedVersion {
        version: version.clone(),
        result: updated,
    };
    engine
        .save_evaluation("pol-123", &second, &second.result)
        .await
        .unwrap();

    let count = db::evaluations::count_evaluations(&pool, "pol-123", &version)
        .await
        .unwrap();
    assert_eq!(count, 1, "same natural key must stay a single row");

    let stored = db::evaluations::load_evaluation(&pool, "pol-123", &version)
        .await
        .unwrap()
        .expect("row must exist");
    assert_eq!(stored.result.summary, "두 번째 평가 요약");
    assert_eq!(stored.result.overall_score, 91.0);
}

#[tokio::test]
async fn different_date_suffix_creates_a_new_row() {
    // Pins the date-embedded versioning: same subject and provider on a
    // different day persists a second row instead of updating the first.
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let engine = engine_with(pool.clone(), mock_providers());

    for date in ["2024-01-01", "2024-01-02"] {
        let client = PinnedVersion {
            version: format!("chatgpt-pinned-{date}"),
            result: mock_evaluation(ProviderKind::ChatGpt),
        };
        engine
            .save_evaluation("pol-123", &client, &client.result)
            .await
            .unwrap();
    }

    let history = db::evaluations::load_history(&pool, "pol-123", 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 2, "distinct date suffixes must not collapse");
}

#[tokio::test]
async fn generate_and_save_all_reports_per_provider_outcomes() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let providers: Vec<Arc<dyn ProviderClient>> = vec![
        Arc::new(OpenAiClient::new(None)),
        Arc::new(AnthropicClient::new(None)),
        Arc::new(AlwaysFailing),
    ];
    let engine = engine_with(pool.clone(), providers);

    let run = engine.generate_and_save_all("pol-123").await.unwrap();
    assert!(!run.success, "strict AND must fail with one dead provider");
    assert_eq!(run.results.len(), 3);
    assert!(run.results[0].saved && run.results[0].error.is_none());
    assert!(run.results[1].saved && run.results[1].error.is_none());
    assert!(!run.results[2].saved);
    assert!(run.results[2].error.is_some());
}

#[tokio::test]
async fn generate_and_save_all_succeeds_with_healthy_providers() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let engine = engine_with(pool.clone(), mock_providers());

    let run = engine.generate_and_save_all("pol-123").await.unwrap();
    assert!(run.success);
    assert!(run.results.iter().all(|r| r.saved && r.error.is_none()));

    // one persisted row per provider's model version
    let latest = db::evaluations::load_latest_evaluation(&pool, "pol-123")
        .await
        .unwrap();
    assert!(latest.is_some());
}

#[tokio::test]
async fn history_projection_is_capped_and_ordered() {
    let (_dir, pool) = setup_pool().await;
    seed_subject(&pool).await;
    let engine = engine_with(pool.clone(), mock_providers());

    for day in 1..=12u32 {
        let client = PinnedVersion {
            version: format!("chatgpt-pinned-2024-02-{day:02}"),
            result: mock_evaluation(ProviderKind::ChatGpt),
        };
        engine
            .save_evaluation("pol-123", &client, &client.result)
            .await
            .unwrap();
    }

    let history = db::evaluations::load_history(&pool, "pol-123", 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 10);
    assert!(history.windows(2).all(|w| w[0].evaluation_date >= w[1].evaluation_date));
}
