//! Database initialization
//!
//! Creates the database file on first run and brings the schema up with
//! idempotent `CREATE TABLE IF NOT EXISTS` statements.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL mode allows concurrent readers with one writer, which matters
    // during the jam window when submits, votes and polls overlap
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Bound lock waits instead of failing immediately under contention
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create an in-memory database for tests
///
/// A single connection is used so every handle observes the same
/// in-memory database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent, safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_capabilities_table(pool).await?;
    create_hackathons_table(pool).await?;
    create_teams_table(pool).await?;
    create_team_memberships_table(pool).await?;
    create_idea_jams_table(pool).await?;
    create_idea_jam_entries_table(pool).await?;
    create_jam_surveys_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            archetype TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_capabilities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS capabilities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            proficiency TEXT NOT NULL DEFAULT 'Beginner'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_hackathons_table(pool: &SqlitePool) -> Result<()> {
    // required_capabilities is a JSON text array of tag strings
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hackathons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            required_capabilities TEXT NOT NULL DEFAULT '[]',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_teams_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            lead_id INTEGER NOT NULL REFERENCES users(id),
            hackathon_id INTEGER REFERENCES hackathons(id),
            status TEXT NOT NULL DEFAULT 'Forming',
            max_size INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_team_memberships_table(pool: &SqlitePool) -> Result<()> {
    // Removal sets left_at rather than deleting the row, preserving history
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_memberships (
            team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role TEXT NOT NULL DEFAULT 'Member',
            joined_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            left_at TIMESTAMP,
            PRIMARY KEY (team_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_idea_jams_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS idea_jams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            started_by INTEGER NOT NULL REFERENCES users(id),
            started_at TIMESTAMP NOT NULL,
            ends_at TIMESTAMP NOT NULL,
            status TEXT NOT NULL DEFAULT 'Active'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one Active jam per team; concurrent starts race on this
    // index and the loser returns the winner's jam
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_one_active_jam_per_team
        ON idea_jams(team_id) WHERE status = 'Active'
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_idea_jam_entries_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS idea_jam_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            jam_id INTEGER NOT NULL REFERENCES idea_jams(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id),
            idea_text TEXT NOT NULL,
            votes INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_jam_surveys_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jam_surveys (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            jam_id INTEGER NOT NULL REFERENCES idea_jams(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id),
            continue_in_team INTEGER NOT NULL DEFAULT 1,
            avoid_member_id INTEGER REFERENCES users(id),
            created_at TIMESTAMP NOT NULL,
            UNIQUE (jam_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
