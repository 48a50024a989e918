//! Database row models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Jam session state
///
/// `Active --(now >= ends_at, observed lazily)--> Completed` is the only
/// transition; Completed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum JamStatus {
    Active,
    Completed,
}

/// Team formation state; Active is the locked terminal formation value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum TeamStatus {
    Forming,
    Active,
    Completed,
}

/// Membership role within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    Lead,
    Member,
}

/// The five fixed personality archetypes used for compatibility scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Archetype {
    Builder,
    Designer,
    Researcher,
    Communicator,
    Strategist,
}

/// Declared proficiency level for a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub archetype: Option<Archetype>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Capability {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hackathon {
    pub id: i64,
    pub title: String,
    /// JSON text array of required capability tags
    pub required_capabilities: String,
}

impl Hackathon {
    /// Parse the required-capability tags out of the stored JSON array
    pub fn required_capability_tags(&self) -> Vec<String> {
        serde_json::from_str(&self.required_capabilities).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub lead_id: i64,
    pub hackathon_id: Option<i64>,
    pub status: TeamStatus,
    pub max_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMembership {
    pub team_id: i64,
    pub user_id: i64,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdeaJam {
    pub id: i64,
    pub team_id: i64,
    pub started_by: i64,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: JamStatus,
}

impl IdeaJam {
    /// Whether the session counts as active at the given instant
    ///
    /// Pure function of stored state and the supplied clock reading;
    /// expiry is never driven by a scheduled callback.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == JamStatus::Active && now < self.ends_at
    }

    /// Whether the stored row is stale (marked Active past its end time)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == JamStatus::Active && now >= self.ends_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdeaJamEntry {
    pub id: i64,
    pub jam_id: i64,
    pub user_id: i64,
    pub idea_text: String,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JamSurvey {
    pub id: i64,
    pub jam_id: i64,
    pub user_id: i64,
    pub continue_in_team: bool,
    pub avoid_member_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn jam_ending_at(ends_at: DateTime<Utc>, status: JamStatus) -> IdeaJam {
        IdeaJam {
            id: 1,
            team_id: 1,
            started_by: 1,
            started_at: ends_at - Duration::minutes(10),
            ends_at,
            status,
        }
    }

    #[test]
    fn active_before_end_time() {
        let now = Utc::now();
        let jam = jam_ending_at(now + Duration::minutes(5), JamStatus::Active);
        assert!(jam.is_active_at(now));
        assert!(!jam.is_expired_at(now));
    }

    #[test]
    fn expired_at_and_after_end_time() {
        let now = Utc::now();
        let jam = jam_ending_at(now, JamStatus::Active);
        assert!(!jam.is_active_at(now));
        assert!(jam.is_expired_at(now));

        let jam = jam_ending_at(now - Duration::seconds(1), JamStatus::Active);
        assert!(!jam.is_active_at(now));
        assert!(jam.is_expired_at(now));
    }

    #[test]
    fn completed_never_reverts_to_active() {
        let now = Utc::now();
        // Even with ends_at in the future, Completed stays Completed
        let jam = jam_ending_at(now + Duration::minutes(5), JamStatus::Completed);
        assert!(!jam.is_active_at(now));
        assert!(!jam.is_expired_at(now));
    }
}
