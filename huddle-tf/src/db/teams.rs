//! Team and membership queries

use chrono::{DateTime, Utc};
use huddle_common::db::models::Team;
use huddle_common::Result;
use sqlx::{SqliteConnection, SqlitePool};

/// Fetch a team by id
pub async fn get_team(db: &SqlitePool, team_id: i64) -> Result<Option<Team>> {
    let team = sqlx::query_as::<_, Team>(
        "SELECT id, name, lead_id, hackathon_id, status, max_size FROM teams WHERE id = ?",
    )
    .bind(team_id)
    .fetch_optional(db)
    .await?;

    Ok(team)
}

/// Whether a user is an active member of the team (left_at unset)
pub async fn is_active_member(db: &SqlitePool, team_id: i64, user_id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM team_memberships
        WHERE team_id = ? AND user_id = ? AND left_at IS NULL
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(count > 0)
}

/// User ids of all active members of a team
pub async fn active_member_ids(db: &SqlitePool, team_id: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM team_memberships WHERE team_id = ? AND left_at IS NULL",
    )
    .bind(team_id)
    .fetch_all(db)
    .await?;

    Ok(ids)
}

/// Teams registered for a hackathon
pub async fn list_teams_for_hackathon(db: &SqlitePool, hackathon_id: i64) -> Result<Vec<Team>> {
    let teams = sqlx::query_as::<_, Team>(
        "SELECT id, name, lead_id, hackathon_id, status, max_size FROM teams WHERE hackathon_id = ?",
    )
    .bind(hackathon_id)
    .fetch_all(db)
    .await?;

    Ok(teams)
}

/// Ids of every team the user has ever belonged to (including left teams)
pub async fn team_ids_for_user(db: &SqlitePool, user_id: i64) -> Result<Vec<i64>> {
    let ids =
        sqlx::query_scalar::<_, i64>("SELECT team_id FROM team_memberships WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(db)
            .await?;

    Ok(ids)
}

/// Lock a Forming team to its Active terminal state
///
/// Runs inside the finalize transaction. Returns false when the team was
/// already locked, which rejects a second finalize.
pub async fn lock_team_if_forming(conn: &mut SqliteConnection, team_id: i64) -> Result<bool> {
    let result =
        sqlx::query("UPDATE teams SET status = 'Active' WHERE id = ? AND status = 'Forming'")
            .bind(team_id)
            .execute(conn)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Record a member's departure without deleting the membership row
pub async fn mark_member_left(
    conn: &mut SqliteConnection,
    team_id: i64,
    user_id: i64,
    left_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE team_memberships SET left_at = ?
        WHERE team_id = ? AND user_id = ? AND left_at IS NULL
        "#,
    )
    .bind(left_at)
    .bind(team_id)
    .bind(user_id)
    .execute(conn)
    .await?;

    Ok(())
}
