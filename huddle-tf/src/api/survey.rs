//! Exit-survey and finalization HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ApiResult;
use crate::finalize;
use crate::jam;
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct SurveyRequest {
    pub user_id: i64,
    pub continue_in_team: bool,
    /// Teammate the responder would rather not continue with, if any
    pub avoid_member_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SurveyResponse {
    pub recorded: bool,
}

/// POST /jams/:jam_id/survey - record one exit survey for a completed jam
///
/// One response per responder per jam; a duplicate submission is a 400.
/// Responses are write-only through the API: only the running count is
/// ever exposed, via the SurveyReceived event.
pub async fn submit_survey(
    State(ctx): State<AppContext>,
    Path(jam_id): Path<i64>,
    Json(req): Json<SurveyRequest>,
) -> ApiResult<(StatusCode, Json<SurveyResponse>)> {
    jam::submit_survey(
        &ctx,
        jam_id,
        req.user_id,
        req.continue_in_team,
        req.avoid_member_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(SurveyResponse { recorded: true })))
}

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub team_id: i64,
    pub removed_user_ids: Vec<i64>,
    pub remaining_member_count: usize,
}

/// POST /jams/:jam_id/finalize - lead-only consensus finalization
pub async fn finalize_team(
    State(ctx): State<AppContext>,
    Path(jam_id): Path<i64>,
    Json(req): Json<FinalizeRequest>,
) -> ApiResult<Json<FinalizeResponse>> {
    let jam = jam::load_jam(&ctx, jam_id).await?;
    let removed = finalize::finalize_team(&ctx, jam_id, req.user_id).await?;
    let remaining = crate::db::teams::active_member_ids(&ctx.db, jam.team_id)
        .await?
        .len();

    Ok(Json(FinalizeResponse {
        team_id: jam.team_id,
        removed_user_ids: removed,
        remaining_member_count: remaining,
    }))
}
