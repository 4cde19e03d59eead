use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use super::{
    dto::{CompetitionSummary, MatchSummary, ProfileResponse, UpdateProfileRequest},
    repo,
};
use crate::{
    auth::{extractors::AuthUser, repo_types::User},
    error::{ApiError, ApiResult, AppJson},
    rosters::{repo as rosters_repo, RosterSummary},
    state::AppState,
};

const DISPLAY_NAME_MIN: usize = 2;
const DISPLAY_NAME_MAX: usize = 50;

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).patch(update_me))
        .route("/me/rosters", get(my_rosters))
        .route("/me/matches", get(my_matches))
        .route("/me/competitions", get(my_competitions))
}

/// Trims the name; blank clears it. Length counts characters, not bytes.
pub(crate) fn normalize_display_name(raw: Option<String>) -> ApiResult<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if name.chars().any(char::is_control) {
        return Err(ApiError::Validation(
            "displayName must not contain control characters".into(),
        ));
    }
    let len = name.chars().count();
    if !(DISPLAY_NAME_MIN..=DISPLAY_NAME_MAX).contains(&len) {
        return Err(ApiError::Validation(format!(
            "displayName must be {DISPLAY_NAME_MIN}-{DISPLAY_NAME_MAX} characters"
        )));
    }
    Ok(Some(name.to_string()))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(state.db.pool(), claims.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = claims.user_id, "token for unknown user");
            ApiError::Unauthorized
        })?;
    Ok(Json(ProfileResponse::from(user)))
}

#[instrument(skip(state, claims, body), fields(user_id = claims.user_id))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    AppJson(body): AppJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let Some(display_name) = body.display_name else {
        return Err(ApiError::Validation("displayName is required".into()));
    };
    let display_name = normalize_display_name(display_name)?;

    let user = User::update_display_name(state.db.pool(), claims.user_id, display_name.as_deref())
        .await?
        .ok_or(ApiError::Unauthorized)?;

    info!(user_id = user.id, "display name updated");
    Ok(Json(ProfileResponse::from(user)))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn my_rosters(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<Vec<RosterSummary>>> {
    let rows = rosters_repo::list_by_owner(state.db.pool(), claims.user_id).await?;
    Ok(Json(rows.into_iter().map(RosterSummary::from).collect()))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn my_matches(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<Vec<MatchSummary>>> {
    let rows = repo::list_matches(state.db.pool(), claims.user_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| MatchSummary::for_user(row, claims.user_id))
            .collect(),
    ))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn my_competitions(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<Vec<CompetitionSummary>>> {
    let rows = repo::list_competitions(state.db.pool(), claims.user_id).await?;
    Ok(Json(rows.into_iter().map(CompetitionSummary::from).collect()))
}
