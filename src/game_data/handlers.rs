use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use super::{repo, GameDataKey};
use crate::{
    auth::extractors::AdminUser,
    error::{ApiError, ApiResult, AppJson},
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDataResponse {
    pub key: String,
    pub data: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TryFrom<repo::GameDataEntry> for GameDataResponse {
    type Error = ApiError;

    fn try_from(e: repo::GameDataEntry) -> ApiResult<Self> {
        let data = serde_json::from_str(&e.data).map_err(|err| {
            error!(error = %err, key = %e.key, "stored game data is not valid JSON");
            ApiError::Internal
        })?;
        Ok(Self {
            key: e.key,
            data,
            updated_at: e.updated_at,
        })
    }
}

pub fn game_data_routes() -> Router<AppState> {
    Router::new().route("/game-data/:key", get(get_game_data).put(put_game_data))
}

#[instrument(skip(state))]
pub async fn get_game_data(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GameDataResponse>> {
    let key = GameDataKey::parse(&key).ok_or(ApiError::NotFound)?;
    let entry = repo::get(state.db.pool(), key)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(GameDataResponse::try_from(entry)?))
}

#[instrument(skip(state, admin, body), fields(user_id = admin.user_id))]
pub async fn put_game_data(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(key): Path<String>,
    AppJson(body): AppJson<Value>,
) -> ApiResult<Json<GameDataResponse>> {
    let key = GameDataKey::parse(&key)
        .ok_or_else(|| ApiError::Validation(format!("unknown game data key {key:?}")))?;
    let data = serde_json::to_string(&body).map_err(|e| ApiError::from(anyhow::Error::from(e)))?;
    let entry = repo::upsert(state.db.pool(), key, &data).await?;
    info!(key = key.as_str(), "game data updated");
    Ok(Json(GameDataResponse::try_from(entry)?))
}
