mod app;
mod auth;
mod cli;
mod config;
mod db;
mod entitlement;
mod error;
mod game_data;
mod me;
mod rosters;
mod state;
#[cfg(test)]
mod test_support;

use crate::{cli::Command, config::AppConfig, db::Db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "rosterforge=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse(&args)?;

    if command != Command::Serve {
        let db = Db::open(&config::database_url_from_env(), 1).await?;
        let result = cli::run(command, &db).await;
        db.close().await;
        return result;
    }

    let app_state = AppState::init(AppConfig::from_env()?).await?;
    let app = app::build_app(app_state.clone());
    app::serve(app).await?;

    app_state.db.close().await;
    Ok(())
}
