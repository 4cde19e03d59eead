pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

/// Catalog keys. The set is closed; anything else is not part of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameDataKey {
    Teams,
    Skills,
    StarPlayers,
    Inducements,
}

impl GameDataKey {
    pub const ALL: [GameDataKey; 4] = [
        GameDataKey::Teams,
        GameDataKey::Skills,
        GameDataKey::StarPlayers,
        GameDataKey::Inducements,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameDataKey::Teams => "teams",
            GameDataKey::Skills => "skills",
            GameDataKey::StarPlayers => "star-players",
            GameDataKey::Inducements => "inducements",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == raw)
    }
}

pub fn router() -> Router<AppState> {
    handlers::game_data_routes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip_through_names() {
        for key in GameDataKey::ALL {
            assert_eq!(GameDataKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(GameDataKey::parse("users"), None);
        assert_eq!(GameDataKey::parse("Teams"), None);
    }
}
