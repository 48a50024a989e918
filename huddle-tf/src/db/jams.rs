//! Idea Jam and entry queries

use chrono::{DateTime, Utc};
use huddle_common::db::models::IdeaJam;
use huddle_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Fetch a jam by id
pub async fn get_jam(db: &SqlitePool, jam_id: i64) -> Result<Option<IdeaJam>> {
    let jam = sqlx::query_as::<_, IdeaJam>(
        "SELECT id, team_id, started_by, started_at, ends_at, status FROM idea_jams WHERE id = ?",
    )
    .bind(jam_id)
    .fetch_optional(db)
    .await?;

    Ok(jam)
}

/// Fetch the team's Active jam, if one exists
pub async fn find_active_jam(db: &SqlitePool, team_id: i64) -> Result<Option<IdeaJam>> {
    let jam = sqlx::query_as::<_, IdeaJam>(
        r#"
        SELECT id, team_id, started_by, started_at, ends_at, status
        FROM idea_jams
        WHERE team_id = ? AND status = 'Active'
        "#,
    )
    .bind(team_id)
    .fetch_optional(db)
    .await?;

    Ok(jam)
}

/// Insert a new Active jam and return its id
///
/// Fails with a unique violation if the team already has an Active jam
/// (partial index `idx_one_active_jam_per_team`).
pub async fn insert_jam(
    db: &SqlitePool,
    team_id: i64,
    started_by: i64,
    started_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO idea_jams (team_id, started_by, started_at, ends_at, status)
        VALUES (?, ?, ?, ?, 'Active')
        "#,
    )
    .bind(team_id)
    .bind(started_by)
    .bind(started_at)
    .bind(ends_at)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Mark a stale jam Completed
///
/// The caller has already observed `now >= ends_at`; the status guard
/// makes the transition idempotent under concurrent observers. Returns
/// true for exactly the one caller whose update performed the transition.
pub async fn complete_jam(db: &SqlitePool, jam_id: i64) -> Result<bool> {
    let result =
        sqlx::query("UPDATE idea_jams SET status = 'Completed' WHERE id = ? AND status = 'Active'")
            .bind(jam_id)
            .execute(db)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert an idea entry and return its id
pub async fn insert_entry(
    db: &SqlitePool,
    jam_id: i64,
    user_id: i64,
    idea_text: &str,
) -> Result<i64> {
    let result =
        sqlx::query("INSERT INTO idea_jam_entries (jam_id, user_id, idea_text) VALUES (?, ?, ?)")
            .bind(jam_id)
            .bind(user_id)
            .bind(idea_text)
            .execute(db)
            .await?;

    Ok(result.last_insert_rowid())
}

/// Add one vote to an entry, returning the new count
///
/// Atomic in-place increment; no read-modify-write, so concurrent voters
/// never lose updates. Voter identity is deliberately not recorded here:
/// this function is the single seam where a per-voter uniqueness
/// constraint would be added.
pub async fn increment_votes(db: &SqlitePool, jam_id: i64, entry_id: i64) -> Result<Option<i64>> {
    let votes = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE idea_jam_entries SET votes = votes + 1
        WHERE id = ? AND jam_id = ?
        RETURNING votes
        "#,
    )
    .bind(entry_id)
    .bind(jam_id)
    .fetch_optional(db)
    .await?;

    Ok(votes)
}

/// Entry joined with its author's display name, in rank order
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RankedEntry {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub idea_text: String,
    pub votes: i64,
}

/// List a jam's entries ranked by votes descending, earliest-first on ties
pub async fn list_entries_ranked(db: &SqlitePool, jam_id: i64) -> Result<Vec<RankedEntry>> {
    let entries = sqlx::query_as::<_, RankedEntry>(
        r#"
        SELECT e.id, e.user_id, u.full_name AS user_name, e.idea_text, e.votes
        FROM idea_jam_entries e
        JOIN users u ON e.user_id = u.id
        WHERE e.jam_id = ?
        ORDER BY e.votes DESC, e.id ASC
        "#,
    )
    .bind(jam_id)
    .fetch_all(db)
    .await?;

    Ok(entries)
}
