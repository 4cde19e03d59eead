//! Helpers for driving the assembled router in tests.

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers `email` with password `secret1` and returns the session token.
pub async fn register(app: &Router, email: &str) -> String {
    let creds = serde_json::json!({"email": email, "password": "secret1"});
    let res = send(app, Method::POST, "/auth/register", None, Some(creds)).await;
    assert_eq!(res.status(), axum::http::StatusCode::CREATED);
    body_json(res).await["token"].as_str().unwrap().to_string()
}
