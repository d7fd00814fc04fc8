//! Database access
//!
//! SQLite via sqlx. The engine owns two tables: `subjects` and `evaluations`.
//! Evaluations are uniquely keyed by (subject_id, model_version) to back the
//! upsert-by-natural-key invariant.

pub mod evaluations;
pub mod subjects;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the database connection pool and owned tables.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the engine's tables if they don't exist.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            party TEXT NOT NULL DEFAULT '',
            position TEXT NOT NULL DEFAULT '',
            region TEXT NOT NULL DEFAULT '',
            bio TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluations (
            guid TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            model_version TEXT NOT NULL,
            evaluation_date TEXT NOT NULL,
            overall_score REAL NOT NULL,
            overall_grade TEXT NOT NULL,
            criteria TEXT NOT NULL,
            summary TEXT NOT NULL,
            strengths TEXT NOT NULL DEFAULT '[]',
            weaknesses TEXT NOT NULL DEFAULT '[]',
            sources TEXT NOT NULL DEFAULT '[]',
            pledge_completion_rate REAL NOT NULL DEFAULT 0,
            activity_score REAL NOT NULL DEFAULT 0,
            controversy_score REAL NOT NULL DEFAULT 0,
            sentiment_score REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(subject_id, model_version)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (subjects, evaluations)");

    Ok(())
}
