use serde::{Deserialize, Serialize};

/// Identity facts carried by a session token.
///
/// Produced only by `JwtKeys::verify` and handed to handlers by value; they
/// are never re-checked against the database, so an admin revocation takes
/// effect once the token (at most 7 days old) expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
}
