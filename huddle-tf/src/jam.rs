//! Idea Jam lifecycle
//!
//! Owns the timed session state machine. Expiry is observed lazily: every
//! operation compares the stored `ends_at` against the wall clock and
//! performs the one-way Active -> Completed transition on first contact.
//! There is no background timer anywhere in this module.

use chrono::{Duration, Utc};
use huddle_common::db::models::{IdeaJam, IdeaJamEntry, JamStatus};
use huddle_common::events::HuddleEvent;
use huddle_common::{Error, Result, JAM_DURATION_MINUTES, MAX_IDEA_LEN};
use tracing::info;

use crate::db;
use crate::AppContext;

/// Start a jam for a team, or return the team's existing Active jam
///
/// Idempotent per team: a second start while a jam is Active hands back
/// the running session instead of erroring. Other active members are
/// notified through the configured notifier.
pub async fn start_jam(ctx: &AppContext, team_id: i64, user_id: i64) -> Result<IdeaJam> {
    let team = db::teams::get_team(&ctx.db, team_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("team {}", team_id)))?;

    if !db::teams::is_active_member(&ctx.db, team_id, user_id).await? {
        return Err(Error::NotMember(format!(
            "user {} is not on team {}",
            user_id, team_id
        )));
    }

    if let Some(existing) = db::jams::find_active_jam(&ctx.db, team_id).await? {
        return Ok(existing);
    }

    let started_at = Utc::now();
    let ends_at = started_at + Duration::minutes(JAM_DURATION_MINUTES);

    let jam_id = match db::jams::insert_jam(&ctx.db, team_id, user_id, started_at, ends_at).await {
        Ok(id) => id,
        // Lost the race against a concurrent start: the partial unique
        // index rejected the insert, so the winner's jam is the session
        Err(Error::Database(e)) if db::is_unique_violation(&e) => {
            return db::jams::find_active_jam(&ctx.db, team_id)
                .await?
                .ok_or(Error::Database(e));
        }
        Err(e) => return Err(e),
    };

    let jam = IdeaJam {
        id: jam_id,
        team_id,
        started_by: user_id,
        started_at,
        ends_at,
        status: JamStatus::Active,
    };

    info!("Started jam {} for team {} (ends {})", jam.id, team_id, ends_at);

    let others: Vec<i64> = db::teams::active_member_ids(&ctx.db, team_id)
        .await?
        .into_iter()
        .filter(|id| *id != user_id)
        .collect();
    ctx.notifier.jam_started(&team, &jam, &others);

    ctx.broadcaster.publish(
        jam.id,
        HuddleEvent::JamStarted {
            jam_id: jam.id,
            team_id,
            ends_at,
        },
    );

    Ok(jam)
}

/// Load a jam, applying the lazy expiry transition first
///
/// Safe under concurrent callers: the status-guarded update means racing
/// observers agree on Completed, and only the caller whose update flipped
/// the row publishes the JamCompleted event.
pub async fn load_jam(ctx: &AppContext, jam_id: i64) -> Result<IdeaJam> {
    let mut jam = db::jams::get_jam(&ctx.db, jam_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("idea jam {}", jam_id)))?;

    if jam.is_expired_at(Utc::now()) {
        if db::jams::complete_jam(&ctx.db, jam.id).await? {
            info!("Jam {} expired, marked Completed", jam.id);
            ctx.broadcaster.publish(
                jam.id,
                HuddleEvent::JamCompleted {
                    jam_id: jam.id,
                    team_id: jam.team_id,
                },
            );
        }
        jam.status = JamStatus::Completed;
    }

    Ok(jam)
}

/// Submit an idea to an active jam
pub async fn submit_entry(
    ctx: &AppContext,
    jam_id: i64,
    user_id: i64,
    idea_text: &str,
) -> Result<IdeaJamEntry> {
    let jam = load_jam(ctx, jam_id).await?;

    if jam.status != JamStatus::Active {
        return Err(Error::SessionExpired);
    }

    if !db::teams::is_active_member(&ctx.db, jam.team_id, user_id).await? {
        return Err(Error::NotMember(format!(
            "user {} is not on team {}",
            user_id, jam.team_id
        )));
    }

    let text = prepare_idea_text(idea_text)?;

    let entry_id = db::jams::insert_entry(&ctx.db, jam_id, user_id, &text).await?;

    ctx.broadcaster.publish(
        jam_id,
        HuddleEvent::EntrySubmitted {
            jam_id,
            entry_id,
            author_id: user_id,
            idea_text: text.clone(),
        },
    );

    Ok(IdeaJamEntry {
        id: entry_id,
        jam_id,
        user_id,
        idea_text: text,
        votes: 0,
    })
}

/// Upvote an entry, returning the new vote count
///
/// No per-voter uniqueness: repeated votes from one identity all count.
/// The constraint seam is `db::jams::increment_votes`.
pub async fn vote(ctx: &AppContext, jam_id: i64, entry_id: i64) -> Result<i64> {
    let votes = db::jams::increment_votes(&ctx.db, jam_id, entry_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("idea {}", entry_id)))?;

    ctx.broadcaster.publish(
        jam_id,
        HuddleEvent::EntryVoted {
            jam_id,
            entry_id,
            votes,
        },
    );

    Ok(votes)
}

/// Ranked entries plus whether the jam is still running
pub async fn list_entries(
    ctx: &AppContext,
    jam_id: i64,
) -> Result<(Vec<db::jams::RankedEntry>, bool)> {
    let jam = load_jam(ctx, jam_id).await?;
    let entries = db::jams::list_entries_ranked(&ctx.db, jam_id).await?;
    Ok((entries, jam.status == JamStatus::Active))
}

/// Record an exit survey for a completed jam
///
/// One response per (jam, responder); a duplicate is rejected. Only the
/// count of responses is broadcast, never their content.
pub async fn submit_survey(
    ctx: &AppContext,
    jam_id: i64,
    user_id: i64,
    continue_in_team: bool,
    avoid_member_id: Option<i64>,
) -> Result<()> {
    let jam = load_jam(ctx, jam_id).await?;

    if jam.status != JamStatus::Completed {
        return Err(Error::NotReady(
            "survey can only be filled out after the jam is completed".into(),
        ));
    }

    if db::surveys::survey_exists(&ctx.db, jam_id, user_id).await? {
        return Err(Error::Duplicate("survey already submitted".into()));
    }

    let avoid = avoid_member_id.filter(|id| *id > 0);

    match db::surveys::insert_survey(&ctx.db, jam_id, user_id, continue_in_team, avoid, Utc::now())
        .await
    {
        Ok(_) => {}
        // Unique constraint backstops the existence check under races
        Err(e) if db::is_unique_violation(&e) => {
            return Err(Error::Duplicate("survey already submitted".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let survey_count = db::surveys::count_surveys(&ctx.db, jam_id).await?;
    ctx.broadcaster
        .publish(jam_id, HuddleEvent::SurveyReceived { jam_id, survey_count });

    Ok(())
}

/// Trim and cap idea text; empty-after-trim is a validation failure
fn prepare_idea_text(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyContent);
    }
    Ok(trimmed.chars().take(MAX_IDEA_LEN).collect())
}
