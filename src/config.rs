use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Argon2 work factor. Defaults match the argon2 crate's recommended params.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            m_cost: argon2::Params::DEFAULT_M_COST,
            t_cost: argon2::Params::DEFAULT_T_COST,
            p_cost: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url_from_env();
        let database_max_connections = env_parse("DATABASE_MAX_CONNECTIONS").unwrap_or(8);

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        anyhow::ensure!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "rosterforge".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "rosterforge-users".into()),
        };

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            m_cost: env_parse("ARGON2_M_COST").unwrap_or(defaults.m_cost),
            t_cost: env_parse("ARGON2_T_COST").unwrap_or(defaults.t_cost),
            p_cost: env_parse("ARGON2_P_COST").unwrap_or(defaults.p_cost),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            jwt,
            password,
        })
    }
}

pub fn database_url_from_env() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rosterforge.db".into())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
