//! poliscore - multi-provider politician evaluation engine
//!
//! Composition root: resolves configuration, initializes the database pool,
//! constructs the provider clients and engine explicitly, and dispatches the
//! CLI commands. No module-level singletons; every collaborator is built here
//! and handed down.

use anyhow::Result;
use clap::{Parser, Subcommand};
use poliscore::config::EngineConfig;
use poliscore::db;
use poliscore::engine::{EvaluationEngine, StaticFeeds};
use poliscore::metrics::RandomMetrics;
use poliscore::providers::default_providers;
use poliscore::report::ReportGenerator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poliscore", version, about = "Multi-provider AI evaluation engine")]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "POLISCORE_DB", default_value = "poliscore.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert the demo subject for local runs
    Seed,
    /// Run a full evaluation for a subject across all providers
    Evaluate {
        /// Subject identifier
        subject_id: String,
    },
    /// Generate a PDF report from the latest persisted evaluation
    Report {
        /// Subject identifier
        subject_id: String,
        /// Output path for the PDF
        #[arg(long, default_value = "report.pdf")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting poliscore v{}", env!("CARGO_PKG_VERSION"));
    let pool = db::init_database_pool(&cli.db).await?;

    match cli.command {
        Command::Seed => seed(&pool).await,
        Command::Evaluate { subject_id } => evaluate(pool, &subject_id).await,
        Command::Report { subject_id, output } => report(pool, &subject_id, &output).await,
    }
}

async fn seed(pool: &sqlx::SqlitePool) -> Result<()> {
    let subject = db::subjects::SubjectRow {
        id: "pol-123".to_string(),
        name: "홍길동".to_string(),
        party: "무소속".to_string(),
        position: "국회의원".to_string(),
        region: "서울 종로구".to_string(),
        bio: "시민운동가 출신 3선 의원. 예산결산특별위원회 위원.".to_string(),
    };
    db::subjects::save_subject(pool, &subject).await?;
    info!(subject_id = %subject.id, name = %subject.name, "demo subject seeded");
    Ok(())
}

async fn evaluate(pool: sqlx::SqlitePool, subject_id: &str) -> Result<()> {
    let engine = EvaluationEngine::new(
        pool,
        default_providers(),
        Arc::new(StaticFeeds),
        Arc::new(RandomMetrics),
        EngineConfig::default(),
    );

    let run = engine.generate_and_save_all(subject_id).await?;
    for outcome in &run.results {
        match &outcome.error {
            None => info!(provider = %outcome.provider, saved = outcome.saved, "provider outcome"),
            Some(err) => error!(provider = %outcome.provider, error = %err, "provider outcome"),
        }
    }

    if run.success {
        info!(subject_id, "all providers generated and saved");
        Ok(())
    } else {
        anyhow::bail!("evaluation run finished with failures (see per-provider log output)")
    }
}

async fn report(pool: sqlx::SqlitePool, subject_id: &str, output: &PathBuf) -> Result<()> {
    let subject_row = db::subjects::load_subject(&pool, subject_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("subject not found: {subject_id}"))?;
    let evaluation = db::evaluations::load_latest_evaluation(&pool, subject_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no persisted evaluation for {subject_id}"))?;
    let history = db::evaluations::load_history(&pool, subject_id, 10).await?;

    // The report profile only needs the core fields; the feed lists do not
    // appear in the rendered document.
    let profile = poliscore::types::SubjectProfile {
        id: subject_row.id,
        name: subject_row.name,
        party: subject_row.party,
        position: subject_row.position,
        region: subject_row.region,
        bio: subject_row.bio,
        recent_activities: Vec::new(),
        pledges: Vec::new(),
        news: Vec::new(),
    };

    let generator = ReportGenerator::new();
    let result = generator.generate_pdf(&profile, &evaluation, &history).await;
    generator.close_browser().await;

    let pdf = result?;
    std::fs::write(output, &pdf)?;
    info!(path = %output.display(), bytes = pdf.len(), "report written");
    Ok(())
}
