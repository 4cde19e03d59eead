use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::Claims;
use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Fixed session lifetime. There is no refresh; callers log in again.
pub const TOKEN_TTL: Duration = Duration::days(7);

/// Signed JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    sub: String, // user ID
    email: String,
    #[serde(rename = "isAdmin")]
    is_admin: bool,
    iat: i64,
    exp: i64,
    iss: String,
    aud: String,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    pub fn issue(&self, claims: &Claims) -> anyhow::Result<String> {
        self.issue_at(claims, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, claims: &Claims, issued_at: OffsetDateTime) -> anyhow::Result<String> {
        let payload = TokenPayload {
            sub: claims.user_id.to_string(),
            email: claims.email.clone(),
            is_admin: claims.is_admin,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + TOKEN_TTL).unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)?;
        debug!(user_id = claims.user_id, is_admin = claims.is_admin, "jwt signed");
        Ok(token)
    }

    /// Fails with `InvalidToken` on a bad signature, malformed input, wrong
    /// issuer/audience, or an `exp` that is already in the past (no leeway).
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        let data = decode::<TokenPayload>(token, &self.decoding, &validation).map_err(|e| {
            warn!(kind = ?e.kind(), "token rejected");
            ApiError::InvalidToken
        })?;

        let user_id = data.claims.sub.parse::<i64>().map_err(|_| {
            warn!(sub = %data.claims.sub, "token subject is not a user id");
            ApiError::InvalidToken
        })?;

        debug!(user_id, "jwt verified");
        Ok(Claims {
            user_id,
            email: data.claims.email,
            is_admin: data.claims.is_admin,
        })
    }
}
