use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::db::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = Db::open(&config.database_url, config.database_max_connections).await?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }

    pub fn from_parts(db: Db, config: Arc<AppConfig>) -> Self {
        let jwt = JwtKeys::new(&config.jwt);
        Self { db, config, jwt }
    }

    /// In-memory store, fixed JWT settings and a cheap Argon2 work factor.
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::config::{JwtConfig, PasswordConfig};

        let db = Db::open_in_memory().await.expect("in-memory db");
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            database_max_connections: 1,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            password: PasswordConfig {
                m_cost: 1024,
                t_cost: 1,
                p_cost: 1,
            },
        });
        Self::from_parts(db, config)
    }
}
