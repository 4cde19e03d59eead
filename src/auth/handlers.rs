use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Claims,
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::User,
    },
    error::{ApiError, ApiResult, AppJson},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(auth_me))
}

fn token_for(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = Claims {
        user_id: user.id,
        email: user.email.clone(),
        is_admin: user.is_admin,
    };
    Ok(state.jwt.issue(&claims)?)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    // stored as typed apart from surrounding whitespace; no case folding
    let email = payload.email.trim().to_string();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let hash = hash_password_blocking(payload.password, state.config.password.clone()).await?;

    let user = User::create(state.db.pool(), &email, &hash)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                warn!(email = %email, "email already registered");
                ApiError::EmailAlreadyExists
            }
            other => other,
        })?;

    let token = token_for(&state, &user)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = payload.email.trim();

    let Some(user) = User::find_by_email(state.db.pool(), email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    let ok = verify_password_blocking(payload.password, user.password_hash.clone()).await?;
    if !ok {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = token_for(&state, &user)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, claims), fields(user_id = claims.user_id))]
pub async fn auth_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = User::find_by_id(state.db.pool(), claims.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = claims.user_id, "token for unknown user");
            ApiError::Unauthorized
        })?;
    Ok(Json(PublicUser::from(&user)))
}
