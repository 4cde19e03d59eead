use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    dto::{
        CreateRosterRequest, CreatedRosterResponse, RosterDetails, RosterSummary, ShareResponse,
        SharedRoster, UpdateRosterRequest,
    },
    repo,
    repo_types::{NewRoster, RosterPatch},
    share,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult, AppJson},
    state::AppState,
};

// --- routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/rosters", get(list_rosters))
        .route("/rosters/:id", get(get_roster))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/rosters", post(create_roster))
        .route("/rosters/:id", axum::routing::put(update_roster).delete(delete_roster))
}

pub fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/rosters/:id/share", post(create_share).delete(revoke_share))
        .route("/shared/:share_id", get(get_shared))
}

// --- validation ---

fn require_text(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{field} is required"))),
    }
}

fn reject_blank(value: &Option<String>, field: &str) -> ApiResult<()> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(ApiError::Validation(format!("{field} must not be empty")))
        }
        _ => Ok(()),
    }
}

fn encode_document(data: &Value) -> ApiResult<String> {
    serde_json::to_string(data).map_err(|e| ApiError::from(anyhow::Error::from(e)))
}

// --- handlers ---

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn list_rosters(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<Vec<RosterSummary>>> {
    let rows = repo::list_by_owner(state.db.pool(), claims.user_id).await?;
    Ok(Json(rows.into_iter().map(RosterSummary::from).collect()))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn get_roster(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<RosterDetails>> {
    let roster = repo::get_owned(state.db.pool(), &id, claims.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(RosterDetails::try_from(roster)?))
}

#[instrument(skip(state, claims, body), fields(user_id = claims.user_id))]
pub async fn create_roster(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    AppJson(body): AppJson<CreateRosterRequest>,
) -> ApiResult<(StatusCode, Json<CreatedRosterResponse>)> {
    let id = require_text(body.id, "id")?;
    let team_id = require_text(body.team_id, "teamId")?;
    let team_name = require_text(body.team_name, "teamName")?;
    let data = match body.data {
        Some(v) if !v.is_null() => encode_document(&v)?,
        _ => return Err(ApiError::Validation("data is required".into())),
    };
    let name = body.name.unwrap_or_default();

    let new = NewRoster {
        id: &id,
        owner_id: claims.user_id,
        name: &name,
        team_id: &team_id,
        team_name: &team_name,
        data: &data,
    };
    let roster = repo::create(state.db.pool(), &new)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                warn!(roster_id = %id, "roster id already exists");
                ApiError::Conflict("Roster id already exists".into())
            }
            other => other,
        })?;

    info!(roster_id = %roster.id, "roster created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedRosterResponse { id: roster.id }),
    ))
}

#[instrument(skip(state, claims, body), fields(user_id = claims.user_id))]
pub async fn update_roster(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateRosterRequest>,
) -> ApiResult<Json<RosterDetails>> {
    reject_blank(&body.team_id, "teamId")?;
    reject_blank(&body.team_name, "teamName")?;
    let data = body.data.as_ref().map(encode_document).transpose()?;

    let patch = RosterPatch {
        name: body.name.as_deref(),
        team_id: body.team_id.as_deref(),
        team_name: body.team_name.as_deref(),
        data: data.as_deref(),
    };
    let roster = repo::update_owned(state.db.pool(), &id, claims.user_id, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(roster_id = %roster.id, "roster updated");
    Ok(Json(RosterDetails::try_from(roster)?))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn delete_roster(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !repo::delete_owned(state.db.pool(), &id, claims.user_id).await? {
        return Err(ApiError::NotFound);
    }
    info!(roster_id = %id, "roster deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn create_share(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ShareResponse>> {
    let share_id = share::ensure_share_link(state.db.pool(), &id, claims.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(roster_id = %id, "share link active");
    Ok(Json(ShareResponse { share_id }))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn revoke_share(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !share::revoke(state.db.pool(), &id, claims.user_id).await? {
        return Err(ApiError::NotFound);
    }
    info!(roster_id = %id, "share link revoked");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_shared(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> ApiResult<Json<SharedRoster>> {
    let roster = share::resolve_public(state.db.pool(), &share_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(SharedRoster::try_from(roster)?))
}
