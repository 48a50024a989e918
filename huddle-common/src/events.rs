//! Domain event types for the Huddle event system
//!
//! Events are published per jam room and serialized for SSE transmission.
//! The serialized enum is the SSE `data:` payload; `event_type()` supplies
//! the SSE `event:` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events broadcast to clients subscribed to a jam room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HuddleEvent {
    /// A jam session was started for a team
    JamStarted {
        jam_id: i64,
        team_id: i64,
        ends_at: DateTime<Utc>,
    },

    /// A new idea was submitted during an active jam
    EntrySubmitted {
        jam_id: i64,
        entry_id: i64,
        author_id: i64,
        idea_text: String,
    },

    /// An idea received a vote
    EntryVoted {
        jam_id: i64,
        entry_id: i64,
        votes: i64,
    },

    /// The jam crossed its end time and transitioned to Completed
    JamCompleted { jam_id: i64, team_id: i64 },

    /// An exit survey was recorded (count only; responses stay private)
    SurveyReceived { jam_id: i64, survey_count: i64 },

    /// The team lead finalized the team from survey results
    TeamFinalized {
        team_id: i64,
        removed_user_ids: Vec<i64>,
    },
}

impl HuddleEvent {
    /// Event type string used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            HuddleEvent::JamStarted { .. } => "JamStarted",
            HuddleEvent::EntrySubmitted { .. } => "EntrySubmitted",
            HuddleEvent::EntryVoted { .. } => "EntryVoted",
            HuddleEvent::JamCompleted { .. } => "JamCompleted",
            HuddleEvent::SurveyReceived { .. } => "SurveyReceived",
            HuddleEvent::TeamFinalized { .. } => "TeamFinalized",
        }
    }
}
