//! Consensus-based team finalization
//!
//! Converts exit-survey responses into membership removals and locks the
//! team. The removal computation is a pure two-pass function; the apply
//! step is a single transaction so removals and the lock commit together
//! or not at all.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use huddle_common::db::models::{JamStatus, JamSurvey};
use huddle_common::events::HuddleEvent;
use huddle_common::{Error, Result};
use tracing::info;

use crate::db;
use crate::jam;
use crate::AppContext;

/// Compute the identities to remove from a team, given the lead, the set
/// of active members, and the jam's survey responses
///
/// Two passes over the survey set, in order:
/// 1. Opt-outs: every responder with `continue_in_team == false` is
///    removed, except the lead, who cannot remove themself this way.
/// 2. Avoid votes: a nominated member is removed when the nominating
///    responder did not opt out in pass 1, the target is not the lead,
///    and the target is an active member.
///
/// Suppression in pass 2 looks only at pass-1 opt-outs, never at other
/// avoid votes, so the outcome is independent of survey order and needs
/// no fixpoint iteration.
pub fn compute_removals(
    lead_id: i64,
    members: &HashSet<i64>,
    surveys: &[JamSurvey],
) -> BTreeSet<i64> {
    let mut opted_out: HashSet<i64> = HashSet::new();
    for survey in surveys {
        if !survey.continue_in_team && survey.user_id != lead_id {
            opted_out.insert(survey.user_id);
        }
    }

    let mut removals: BTreeSet<i64> = opted_out.iter().copied().collect();
    for survey in surveys {
        if let Some(target) = survey.avoid_member_id {
            if !opted_out.contains(&survey.user_id)
                && target != lead_id
                && members.contains(&target)
            {
                removals.insert(target);
            }
        }
    }

    removals.retain(|id| members.contains(id));
    removals
}

/// Finalize a team from its completed jam's surveys
///
/// Precondition failures, checked in order: jam must exist (NotFound),
/// jam must be Completed (NotReady), caller must be the team lead
/// (Forbidden). Returns the identities actually removed.
pub async fn finalize_team(ctx: &AppContext, jam_id: i64, caller_id: i64) -> Result<Vec<i64>> {
    let jam = jam::load_jam(ctx, jam_id).await?;

    if jam.status != JamStatus::Completed {
        return Err(Error::NotReady("jam must be completed to finalize".into()));
    }

    let team = db::teams::get_team(&ctx.db, jam.team_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("team {}", jam.team_id)))?;

    if team.lead_id != caller_id {
        return Err(Error::Forbidden(
            "only the team lead can finalize the team".into(),
        ));
    }

    let members: HashSet<i64> = db::teams::active_member_ids(&ctx.db, team.id)
        .await?
        .into_iter()
        .collect();
    let surveys = db::surveys::list_surveys(&ctx.db, jam_id).await?;

    let removals = compute_removals(team.lead_id, &members, &surveys);

    // Removals and the team lock are all-or-nothing. The conditional lock
    // update also serializes finalization: a second caller finds the team
    // already out of Forming and is rejected.
    let now = Utc::now();
    let mut tx = ctx.db.begin().await?;

    if !db::teams::lock_team_if_forming(&mut tx, team.id).await? {
        return Err(Error::NotReady("team formation is already finalized".into()));
    }

    for user_id in &removals {
        db::teams::mark_member_left(&mut tx, team.id, *user_id, now).await?;
    }

    tx.commit().await?;

    let removed: Vec<i64> = removals.into_iter().collect();
    info!(
        "Finalized team {} from jam {}: removed {:?}",
        team.id, jam_id, removed
    );

    ctx.broadcaster.publish(
        jam_id,
        HuddleEvent::TeamFinalized {
            team_id: team.id,
            removed_user_ids: removed.clone(),
        },
    );

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const LEAD: i64 = 1;

    fn survey(user_id: i64, continue_in_team: bool, avoid: Option<i64>) -> JamSurvey {
        JamSurvey {
            id: user_id,
            jam_id: 1,
            user_id,
            continue_in_team,
            avoid_member_id: avoid,
            created_at: Utc::now(),
        }
    }

    fn members(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn opt_out_removes_the_responder() {
        let removals = compute_removals(
            LEAD,
            &members(&[LEAD, 2, 3]),
            &[survey(2, false, None), survey(3, true, None)],
        );
        assert_eq!(removals, BTreeSet::from([2]));
    }

    #[test]
    fn lead_cannot_opt_themself_out() {
        let removals =
            compute_removals(LEAD, &members(&[LEAD, 2]), &[survey(LEAD, false, None)]);
        assert!(removals.is_empty());
    }

    #[test]
    fn avoid_vote_from_staying_member_removes_target() {
        let removals = compute_removals(
            LEAD,
            &members(&[LEAD, 2, 3]),
            &[survey(2, true, Some(3))],
        );
        assert_eq!(removals, BTreeSet::from([3]));
    }

    #[test]
    fn avoid_vote_from_removed_member_is_suppressed() {
        // 2 opts out; their avoid vote against 3 must not count
        let removals = compute_removals(
            LEAD,
            &members(&[LEAD, 2, 3]),
            &[survey(2, false, Some(3))],
        );
        assert_eq!(removals, BTreeSet::from([2]));
    }

    #[test]
    fn avoid_vote_cannot_target_the_lead() {
        let removals =
            compute_removals(LEAD, &members(&[LEAD, 2]), &[survey(2, true, Some(LEAD))]);
        assert!(removals.is_empty());
    }

    #[test]
    fn avoid_vote_against_non_member_is_ignored() {
        let removals =
            compute_removals(LEAD, &members(&[LEAD, 2]), &[survey(2, true, Some(99))]);
        assert!(removals.is_empty());
    }

    #[test]
    fn end_to_end_scenario_removes_opt_out_and_avoided() {
        // Team of 3: lead L=1, members 2 and 3. 2 opts out; the lead
        // stays and avoids 3; 3 stays. Expected removals: {2, 3}.
        let removals = compute_removals(
            LEAD,
            &members(&[LEAD, 2, 3]),
            &[
                survey(2, false, None),
                survey(LEAD, true, Some(3)),
                survey(3, true, None),
            ],
        );
        assert_eq!(removals, BTreeSet::from([2, 3]));
    }

    #[test]
    fn outcome_is_independent_of_survey_order() {
        let surveys = [
            survey(2, false, Some(4)),
            survey(LEAD, true, Some(3)),
            survey(3, true, None),
            survey(4, true, None),
        ];
        let all = members(&[LEAD, 2, 3, 4]);

        let forward = compute_removals(LEAD, &all, &surveys);
        let mut reversed = surveys.to_vec();
        reversed.reverse();
        let backward = compute_removals(LEAD, &all, &reversed);

        assert_eq!(forward, backward);
        // 2 opted out, so 2's avoid vote against 4 is suppressed;
        // the lead's avoid vote removes 3
        assert_eq!(forward, BTreeSet::from([2, 3]));
    }
}
