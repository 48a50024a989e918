//! Exit-survey queries

use chrono::{DateTime, Utc};
use huddle_common::db::models::JamSurvey;
use huddle_common::Result;
use sqlx::SqlitePool;

/// Whether this responder already submitted a survey for the jam
pub async fn survey_exists(db: &SqlitePool, jam_id: i64, user_id: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM jam_surveys WHERE jam_id = ? AND user_id = ?")
            .bind(jam_id)
            .bind(user_id)
            .fetch_one(db)
            .await?;

    Ok(count > 0)
}

/// Insert a survey response
///
/// The (jam_id, user_id) unique constraint backstops the existence check
/// under concurrent submission.
pub async fn insert_survey(
    db: &SqlitePool,
    jam_id: i64,
    user_id: i64,
    continue_in_team: bool,
    avoid_member_id: Option<i64>,
    created_at: DateTime<Utc>,
) -> std::result::Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO jam_surveys (jam_id, user_id, continue_in_team, avoid_member_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(jam_id)
    .bind(user_id)
    .bind(continue_in_team)
    .bind(avoid_member_id)
    .bind(created_at)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All survey responses for a jam
pub async fn list_surveys(db: &SqlitePool, jam_id: i64) -> Result<Vec<JamSurvey>> {
    let surveys = sqlx::query_as::<_, JamSurvey>(
        r#"
        SELECT id, jam_id, user_id, continue_in_team, avoid_member_id, created_at
        FROM jam_surveys WHERE jam_id = ?
        "#,
    )
    .bind(jam_id)
    .fetch_all(db)
    .await?;

    Ok(surveys)
}

/// Number of survey responses recorded for a jam
pub async fn count_surveys(db: &SqlitePool, jam_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jam_surveys WHERE jam_id = ?")
        .bind(jam_id)
        .fetch_one(db)
        .await?;

    Ok(count)
}
