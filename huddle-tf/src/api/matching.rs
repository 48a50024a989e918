//! Match discovery HTTP handlers
//!
//! Scoring itself lives in `scoring::engine`; these handlers only load
//! the profiles, run the engine, and shape the responses.

use axum::extract::{Path, Query, State};
use axum::Json;
use huddle_common::db::models::Team;
use huddle_common::{Error, Result};
use serde::{Deserialize, Serialize};

use super::ApiResult;
use crate::db;
use crate::scoring::{score_candidate, ScoreBreakdown};
use crate::AppContext;

/// Suggestions returned per team
const MAX_SUGGESTIONS: usize = 10;

/// Team matches returned per candidate
const MAX_TEAM_MATCHES: usize = 5;

/// Required capability tags for a team, via its hackathon registration
async fn required_tags_for(ctx: &AppContext, team: &Team) -> Result<Vec<String>> {
    let Some(hackathon_id) = team.hackathon_id else {
        return Ok(Vec::new());
    };
    Ok(db::profiles::get_hackathon(&ctx.db, hackathon_id)
        .await?
        .map(|h| h.required_capability_tags())
        .unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    pub user_id: i64,
    pub team_id: i64,
}

/// GET /match/score?user_id=&team_id= - score one candidate against one team
pub async fn score(
    State(ctx): State<AppContext>,
    Query(query): Query<ScoreQuery>,
) -> ApiResult<Json<ScoreBreakdown>> {
    let candidate = db::profiles::candidate_profile(&ctx.db, query.user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {}", query.user_id)))?;

    let team = db::teams::get_team(&ctx.db, query.team_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("team {}", query.team_id)))?;

    let required = required_tags_for(&ctx, &team).await?;
    let members = db::profiles::member_profiles(&ctx.db, team.id).await?;

    let breakdown = score_candidate(
        &candidate,
        team.id,
        &required,
        &members,
        ctx.inference.as_ref(),
    );

    Ok(Json(breakdown))
}

#[derive(Debug, Deserialize)]
pub struct CallerQuery {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SuggestedMember {
    pub user_id: i64,
    pub full_name: String,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

/// GET /match/suggest/:team_id?user_id= - ranked candidate suggestions
///
/// Lead-only: the suggestion list leaks scoring detail about every
/// registered user, so only the team lead may request it.
pub async fn suggest_members(
    State(ctx): State<AppContext>,
    Path(team_id): Path<i64>,
    Query(caller): Query<CallerQuery>,
) -> ApiResult<Json<Vec<SuggestedMember>>> {
    let team = db::teams::get_team(&ctx.db, team_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("team {}", team_id)))?;

    if team.lead_id != caller.user_id {
        return Err(Error::Forbidden("only the team lead can view suggestions".into()).into());
    }

    let required = required_tags_for(&ctx, &team).await?;
    let members = db::profiles::member_profiles(&ctx.db, team.id).await?;
    let member_ids: Vec<i64> = members.iter().map(|m| m.id).collect();

    let mut suggestions: Vec<SuggestedMember> = db::profiles::all_profiles(&ctx.db)
        .await?
        .into_iter()
        .filter(|p| !member_ids.contains(&p.id))
        .map(|candidate| {
            let breakdown = score_candidate(
                &candidate,
                team.id,
                &required,
                &members,
                ctx.inference.as_ref(),
            );
            SuggestedMember {
                user_id: candidate.id,
                full_name: candidate.full_name,
                breakdown,
            }
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.breakdown
            .score
            .partial_cmp(&a.breakdown.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.user_id.cmp(&b.user_id))
    });
    suggestions.truncate(MAX_SUGGESTIONS);

    Ok(Json(suggestions))
}

#[derive(Debug, Serialize)]
pub struct TeamMatch {
    pub team_id: i64,
    pub team_name: String,
    pub member_count: usize,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
}

/// GET /match/teams-for-me/:hackathon_id?user_id= - teams ranked for a user
///
/// Skips teams the user has ever belonged to, including teams they were
/// removed from during finalization.
pub async fn teams_for_me(
    State(ctx): State<AppContext>,
    Path(hackathon_id): Path<i64>,
    Query(caller): Query<CallerQuery>,
) -> ApiResult<Json<Vec<TeamMatch>>> {
    let candidate = db::profiles::candidate_profile(&ctx.db, caller.user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user {}", caller.user_id)))?;

    let hackathon = db::profiles::get_hackathon(&ctx.db, hackathon_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("hackathon {}", hackathon_id)))?;
    let required = hackathon.required_capability_tags();

    let own_teams = db::teams::team_ids_for_user(&ctx.db, caller.user_id).await?;

    let mut matches = Vec::new();
    for team in db::teams::list_teams_for_hackathon(&ctx.db, hackathon_id).await? {
        if own_teams.contains(&team.id) {
            continue;
        }

        let members = db::profiles::member_profiles(&ctx.db, team.id).await?;
        let breakdown = score_candidate(
            &candidate,
            team.id,
            &required,
            &members,
            ctx.inference.as_ref(),
        );

        matches.push(TeamMatch {
            team_id: team.id,
            team_name: team.name,
            member_count: members.len(),
            breakdown,
        });
    }

    matches.sort_by(|a, b| {
        b.breakdown
            .score
            .partial_cmp(&a.breakdown.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.team_id.cmp(&b.team_id))
    });
    matches.truncate(MAX_TEAM_MATCHES);

    Ok(Json(matches))
}
