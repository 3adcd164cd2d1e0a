//! Route handlers. Each one is a thin shim over [`ArenaService`].
//!
//! [`ArenaService`]: crate::arena::ArenaService

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::debug;

use super::AppState;
use super::error::ApiError;
use super::extract::CurrentUser;
use super::views::{
    ChallengeDetail, ChallengeView, CreateChallengeRequest, PauseResponse, XpLogResponse,
};
use crate::arena::{LeaderboardEntry, SettlementVerdict};

const XP_LOG_LIMIT: u32 = 50;

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `POST /challenge/create`
pub async fn create_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Result<Json<CreateChallengeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChallengeView>), ApiError> {
    let Json(req) = body?;
    let row = state
        .service
        .create(
            &user.id,
            &req.opponent_id,
            &req.task_description,
            req.duration_minutes,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ChallengeView::for_viewer(row, &user.id)),
    ))
}

/// `POST /challenge/accept/{id}`
pub async fn accept_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ChallengeView>, ApiError> {
    let row = state.service.accept(&id, &user.id).await?;
    Ok(Json(ChallengeView::for_viewer(row, &user.id)))
}

/// `POST /challenge/pause/{id}`
pub async fn record_pause(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<PauseResponse>, ApiError> {
    let counters = state.service.record_pause(&id, &user.id).await?;
    Ok(Json(PauseResponse { ok: true, counters }))
}

/// `POST /challenge/complete/{id}`
pub async fn complete_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SettlementVerdict>, ApiError> {
    Ok(Json(state.service.settle(&id, &user.id).await?))
}

/// `GET /challenge/my`
pub async fn my_challenges(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ChallengeView>>, ApiError> {
    let rows = state.service.list_open(&user.id).await?;
    debug!(user_id = %user.id, count = rows.len(), "Listed open challenges");
    Ok(Json(
        rows.into_iter()
            .map(|row| ChallengeView::for_viewer(row, &user.id))
            .collect(),
    ))
}

/// `GET /challenge/{id}`
pub async fn get_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ChallengeDetail>, ApiError> {
    let (row, result) = state.service.get_for_participant(&id, &user.id).await?;
    Ok(Json(ChallengeDetail {
        challenge: ChallengeView::for_viewer(row, &user.id),
        result,
    }))
}

/// `GET /leaderboard`
pub async fn leaderboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(state.service.leaderboard(&user.id).await?))
}

/// `GET /xp/log`
pub async fn xp_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<XpLogResponse>, ApiError> {
    let entries = state
        .service
        .db()
        .list_xp_log(&user.id, XP_LOG_LIMIT)
        .await
        .map_err(crate::arena::ArenaError::from)?;
    Ok(Json(XpLogResponse {
        xp: user.xp,
        entries,
    }))
}
