use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, game_data, me, rosters};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(me::router())
        .merge(rosters::router())
        .merge(game_data::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake().await);
        let res = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = build_app(AppState::fake().await);
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/auth/login")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let res = tower::ServiceExt::oneshot(app, req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_create_share_and_read_publicly() {
        let app = build_app(AppState::fake().await);

        let res = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"email": "a@x.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let owner = body_json(res).await["token"].as_str().unwrap().to_string();

        let roster = json!({"id": "r1", "teamId": "t1", "teamName": "Orcs", "data": {}});
        let res = send(&app, Method::POST, "/rosters", Some(&owner), Some(roster)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(body_json(res).await["id"], "r1");

        let res = send(&app, Method::GET, "/rosters/r1", Some(&owner), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["id"], "r1");
        assert_eq!(body["teamId"], "t1");
        assert_eq!(body["teamName"], "Orcs");
        assert_eq!(body["name"], "");
        assert_eq!(body["data"], json!({}));

        let res = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"email": "b@x.com", "password": "secret1"})),
        )
        .await;
        let other = body_json(res).await["token"].as_str().unwrap().to_string();
        let res = send(&app, Method::GET, "/rosters/r1", Some(&other), None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = send(&app, Method::POST, "/rosters/r1/share", Some(&owner), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let share_id = body_json(res).await["shareId"].as_str().unwrap().to_string();

        let res = send(&app, Method::GET, &format!("/shared/{share_id}"), None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["teamName"], "Orcs");
        assert_eq!(body["data"], json!({}));
        let fields = body.as_object().unwrap();
        assert!(!fields.keys().any(|k| k.to_lowercase().contains("owner")));
    }
}
