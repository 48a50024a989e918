//! Idea Jam HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use huddle_common::db::models::{IdeaJam, IdeaJamEntry, JamStatus};
use serde::{Deserialize, Serialize};

use super::ApiResult;
use crate::db;
use crate::jam;
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct StartJamRequest {
    pub user_id: i64,
}

/// POST /jams/start/:team_id - start a 10-minute jam for a team
///
/// Returns the team's running jam if one is already Active instead of
/// erroring (idempotent-by-team semantics).
pub async fn start_jam(
    State(ctx): State<AppContext>,
    Path(team_id): Path<i64>,
    Json(req): Json<StartJamRequest>,
) -> ApiResult<Json<IdeaJam>> {
    let jam = jam::start_jam(&ctx, team_id, req.user_id).await?;
    Ok(Json(jam))
}

#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Teammate {
    pub id: i64,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct JamDetailResponse {
    #[serde(flatten)]
    pub jam: IdeaJam,
    /// Whether the viewing user already submitted their exit survey
    pub has_submitted_survey: bool,
    /// Teammates eligible for the viewer's avoid nomination
    pub teammates: Vec<Teammate>,
}

/// GET /jams/:jam_id - jam state plus the viewer's survey progress
///
/// Reading a stale jam performs the lazy Active -> Completed transition,
/// so the reported state is always consistent with the wall clock.
pub async fn get_jam(
    State(ctx): State<AppContext>,
    Path(jam_id): Path<i64>,
    Query(viewer): Query<ViewerQuery>,
) -> ApiResult<Json<JamDetailResponse>> {
    let jam = jam::load_jam(&ctx, jam_id).await?;

    let mut has_submitted_survey = false;
    let mut teammates = Vec::new();

    if jam.status == JamStatus::Completed {
        if let Some(user_id) = viewer.user_id {
            has_submitted_survey = db::surveys::survey_exists(&ctx.db, jam_id, user_id).await?;
            teammates = db::profiles::member_profiles(&ctx.db, jam.team_id)
                .await?
                .into_iter()
                .filter(|p| p.id != user_id)
                .map(|p| Teammate {
                    id: p.id,
                    full_name: p.full_name,
                })
                .collect();
        }
    }

    Ok(Json(JamDetailResponse {
        jam,
        has_submitted_survey,
        teammates,
    }))
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<db::jams::RankedEntry>,
    pub is_active: bool,
}

/// GET /jams/:jam_id/entries - ranked ideas plus the live flag
pub async fn list_entries(
    State(ctx): State<AppContext>,
    Path(jam_id): Path<i64>,
) -> ApiResult<Json<EntriesResponse>> {
    let (entries, is_active) = jam::list_entries(&ctx, jam_id).await?;
    Ok(Json(EntriesResponse { entries, is_active }))
}

#[derive(Debug, Deserialize)]
pub struct SubmitEntryRequest {
    pub user_id: i64,
    pub idea_text: String,
}

/// POST /jams/:jam_id/entries - submit an idea to an active jam
pub async fn submit_entry(
    State(ctx): State<AppContext>,
    Path(jam_id): Path<i64>,
    Json(req): Json<SubmitEntryRequest>,
) -> ApiResult<(StatusCode, Json<IdeaJamEntry>)> {
    let entry = jam::submit_entry(&ctx, jam_id, req.user_id, &req.idea_text).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub votes: i64,
}

/// POST /jams/:jam_id/entries/:entry_id/vote - upvote an idea
pub async fn vote_entry(
    State(ctx): State<AppContext>,
    Path((jam_id, entry_id)): Path<(i64, i64)>,
) -> ApiResult<Json<VoteResponse>> {
    let votes = jam::vote(&ctx, jam_id, entry_id).await?;
    Ok(Json(VoteResponse { votes }))
}
