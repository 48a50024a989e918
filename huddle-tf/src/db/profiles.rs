//! User, capability, and hackathon lookups feeding the scoring engine

use huddle_common::db::models::{Hackathon, Proficiency, User};
use huddle_common::Result;
use sqlx::SqlitePool;

use crate::scoring::{CandidateProfile, DeclaredCapability};

/// Fetch a user by id
pub async fn get_user(db: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    let user =
        sqlx::query_as::<_, User>("SELECT id, email, full_name, archetype FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    Ok(user)
}

/// Fetch a hackathon by id
pub async fn get_hackathon(db: &SqlitePool, hackathon_id: i64) -> Result<Option<Hackathon>> {
    let hackathon = sqlx::query_as::<_, Hackathon>(
        "SELECT id, title, required_capabilities FROM hackathons WHERE id = ?",
    )
    .bind(hackathon_id)
    .fetch_optional(db)
    .await?;

    Ok(hackathon)
}

#[derive(sqlx::FromRow)]
struct CapabilityRow {
    name: String,
    proficiency: Proficiency,
}

async fn capabilities_for(db: &SqlitePool, user_id: i64) -> Result<Vec<DeclaredCapability>> {
    let rows = sqlx::query_as::<_, CapabilityRow>(
        "SELECT name, proficiency FROM capabilities WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| DeclaredCapability {
            name: r.name,
            proficiency: r.proficiency,
        })
        .collect())
}

fn into_profile(user: User, capabilities: Vec<DeclaredCapability>) -> CandidateProfile {
    CandidateProfile {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        archetype: user.archetype,
        capabilities,
    }
}

/// Load one user's scoring profile (declared capabilities included)
pub async fn candidate_profile(db: &SqlitePool, user_id: i64) -> Result<Option<CandidateProfile>> {
    let Some(user) = get_user(db, user_id).await? else {
        return Ok(None);
    };
    let capabilities = capabilities_for(db, user.id).await?;
    Ok(Some(into_profile(user, capabilities)))
}

/// Scoring profiles of a team's active members
pub async fn member_profiles(db: &SqlitePool, team_id: i64) -> Result<Vec<CandidateProfile>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.email, u.full_name, u.archetype
        FROM users u
        JOIN team_memberships m ON m.user_id = u.id
        WHERE m.team_id = ? AND m.left_at IS NULL
        ORDER BY u.id
        "#,
    )
    .bind(team_id)
    .fetch_all(db)
    .await?;

    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        let capabilities = capabilities_for(db, user.id).await?;
        profiles.push(into_profile(user, capabilities));
    }
    Ok(profiles)
}

/// Scoring profiles of every registered user
pub async fn all_profiles(db: &SqlitePool) -> Result<Vec<CandidateProfile>> {
    let users =
        sqlx::query_as::<_, User>("SELECT id, email, full_name, archetype FROM users ORDER BY id")
            .fetch_all(db)
            .await?;

    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        let capabilities = capabilities_for(db, user.id).await?;
        profiles.push(into_profile(user, capabilities));
    }
    Ok(profiles)
}
