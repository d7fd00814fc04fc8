//! Subject database operations

use anyhow::Result;
use sqlx::{Row, SqlitePool};

/// Subject core record as stored.
#[derive(Debug, Clone)]
pub struct SubjectRow {
    pub id: String,
    pub name: String,
    pub party: String,
    pub position: String,
    pub region: String,
    pub bio: String,
}

/// Save a subject (insert or replace core fields).
pub async fn save_subject(pool: &SqlitePool, subject: &SubjectRow) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO subjects (id, name, party, position, region, bio)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            party = excluded.party,
            position = excluded.position,
            region = excluded.region,
            bio = excluded.bio
        "#,
    )
    .bind(&subject.id)
    .bind(&subject.name)
    .bind(&subject.party)
    .bind(&subject.position)
    .bind(&subject.region)
    .bind(&subject.bio)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a subject by id; `None` when absent.
pub async fn load_subject(pool: &SqlitePool, subject_id: &str) -> Result<Option<SubjectRow>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, party, position, region, bio
        FROM subjects
        WHERE id = ?
        "#,
    )
    .bind(subject_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| SubjectRow {
        id: row.get("id"),
        name: row.get("name"),
        party: row.get("party"),
        position: row.get("position"),
        region: row.get("region"),
        bio: row.get("bio"),
    }))
}
