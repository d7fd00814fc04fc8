//! Evaluation persistence
//!
//! Upsert keyed by (subject_id, model_version): an existing row for the key
//! is updated in place, otherwise a new row is inserted. Rows are never
//! deleted here. List fields and the criteria set are stored as JSON text.

use crate::types::{
    CriteriaSet, EvaluationResult, HistoryEntry, PersistedEvaluation,
};
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Insert or update an evaluation by its natural key.
///
/// Checks for an existing (subject_id, model_version) row first and updates
/// it if found; the second write's field values win.
pub async fn upsert_evaluation(pool: &SqlitePool, eval: &PersistedEvaluation) -> Result<()> {
    let criteria_json = serde_json::to_string(&eval.result.criteria)?;
    let strengths_json = serde_json::to_string(&eval.result.strengths)?;
    let weaknesses_json = serde_json::to_string(&eval.result.weaknesses)?;
    let sources_json = serde_json::to_string(&eval.result.sources)?;
    let date = eval.evaluation_date.format("%Y-%m-%d").to_string();

    let existing: Option<String> = sqlx::query_scalar(
        "SELECT guid FROM evaluations WHERE subject_id = ? AND model_version = ?",
    )
    .bind(&eval.subject_id)
    .bind(&eval.model_version)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(guid) => {
            sqlx::query(
                r#"
                UPDATE evaluations SET
                    evaluation_date = ?,
                    overall_score = ?,
                    overall_grade = ?,
                    criteria = ?,
                    summary = ?,
                    strengths = ?,
                    weaknesses = ?,
                    sources = ?,
                    pledge_completion_rate = ?,
                    activity_score = ?,
                    controversy_score = ?,
                    sentiment_score = ?,
                    updated_at = CURRENT_TIMESTAMP
                WHERE guid = ?
                "#,
            )
            .bind(&date)
            .bind(eval.result.overall_score)
            .bind(&eval.result.overall_grade)
            .bind(&criteria_json)
            .bind(&eval.result.summary)
            .bind(&strengths_json)
            .bind(&weaknesses_json)
            .bind(&sources_json)
            .bind(eval.metrics.pledge_completion_rate)
            .bind(eval.metrics.activity_score)
            .bind(eval.metrics.controversy_score)
            .bind(eval.metrics.sentiment_score)
            .bind(&guid)
            .execute(pool)
            .await?;
            tracing::debug!(
                subject_id = %eval.subject_id,
                model_version = %eval.model_version,
                "updated existing evaluation row"
            );
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO evaluations (
                    guid, subject_id, model_version, evaluation_date,
                    overall_score, overall_grade, criteria, summary,
                    strengths, weaknesses, sources,
                    pledge_completion_rate, activity_score,
                    controversy_score, sentiment_score,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
                "#,
            )
            .bind(eval.guid.to_string())
            .bind(&eval.subject_id)
            .bind(&eval.model_version)
            .bind(&date)
            .bind(eval.result.overall_score)
            .bind(&eval.result.overall_grade)
            .bind(&criteria_json)
            .bind(&eval.result.summary)
            .bind(&strengths_json)
            .bind(&weaknesses_json)
            .bind(&sources_json)
            .bind(eval.metrics.pledge_completion_rate)
            .bind(eval.metrics.activity_score)
            .bind(eval.metrics.controversy_score)
            .bind(eval.metrics.sentiment_score)
            .execute(pool)
            .await?;
            tracing::debug!(
                subject_id = %eval.subject_id,
                model_version = %eval.model_version,
                "inserted new evaluation row"
            );
        }
    }

    Ok(())
}

fn row_to_persisted(row: &sqlx::sqlite::SqliteRow) -> Result<PersistedEvaluation> {
    let guid_str: String = row.get("guid");
    let date_str: String = row.get("evaluation_date");
    let criteria_json: String = row.get("criteria");
    let strengths_json: String = row.get("strengths");
    let weaknesses_json: String = row.get("weaknesses");
    let sources_json: String = row.get("sources");

    let criteria: CriteriaSet = serde_json::from_str(&criteria_json)?;

    Ok(PersistedEvaluation {
        guid: Uuid::parse_str(&guid_str)?,
        subject_id: row.get("subject_id"),
        model_version: row.get("model_version"),
        evaluation_date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?,
        result: EvaluationResult {
            overall_score: row.get("overall_score"),
            overall_grade: row.get("overall_grade"),
            criteria,
            summary: row.get("summary"),
            strengths: serde_json::from_str(&strengths_json)?,
            weaknesses: serde_json::from_str(&weaknesses_json)?,
            sources: serde_json::from_str(&sources_json)?,
        },
        metrics: crate::types::AuxiliaryMetrics {
            pledge_completion_rate: row.get("pledge_completion_rate"),
            activity_score: row.get("activity_score"),
            controversy_score: row.get("controversy_score"),
            sentiment_score: row.get("sentiment_score"),
        },
    })
}

/// Load one evaluation by its natural key.
pub async fn load_evaluation(
    pool: &SqlitePool,
    subject_id: &str,
    model_version: &str,
) -> Result<Option<PersistedEvaluation>> {
    let row = sqlx::query(
        "SELECT * FROM evaluations WHERE subject_id = ? AND model_version = ?",
    )
    .bind(subject_id)
    .bind(model_version)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_persisted).transpose()
}

/// Load the most recently updated evaluation for a subject.
pub async fn load_latest_evaluation(
    pool: &SqlitePool,
    subject_id: &str,
) -> Result<Option<PersistedEvaluation>> {
    let row = sqlx::query(
        r#"
        SELECT * FROM evaluations
        WHERE subject_id = ?
        ORDER BY updated_at DESC, evaluation_date DESC
        LIMIT 1
        "#,
    )
    .bind(subject_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_persisted).transpose()
}

/// Number of rows stored for a (subject, model_version) key.
pub async fn count_evaluations(
    pool: &SqlitePool,
    subject_id: &str,
    model_version: &str,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM evaluations WHERE subject_id = ? AND model_version = ?",
    )
    .bind(subject_id)
    .bind(model_version)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Trend projection for a subject, most recent first.
pub async fn load_history(
    pool: &SqlitePool,
    subject_id: &str,
    limit: i64,
) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT evaluation_date, overall_score, overall_grade
        FROM evaluations
        WHERE subject_id = ?
        ORDER BY evaluation_date DESC
        LIMIT ?
        "#,
    )
    .bind(subject_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let date_str: String = row.get("evaluation_date");
            Ok(HistoryEntry {
                evaluation_date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?,
                overall_score: row.get("overall_score"),
                overall_grade: row.get("overall_grade"),
            })
        })
        .collect()
}
