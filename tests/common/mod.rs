#![allow(dead_code)]

use axum::{Router, body::Body, http::{Request, Response, StatusCode}};
use budget_tracker::{AppConfig, Application, create_app};
use serde_json::{Value, json};
use tower::ServiceExt;

pub async fn memory_app() -> Application {
    create_app(AppConfig::with_database_url("sqlite::memory:"))
        .await
        .expect("in-memory application")
}

pub fn sqlite_file_url(path: &std::path::Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.expect("router never fails")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn signup(router: &Router, email: &str, username: &str, password: &str) -> (StatusCode, Value) {
    let response = send(
        router,
        post_json("/signup", json!({ "email": email, "username": username, "password": password })),
    )
    .await;
    let status = response.status();
    (status, json_body(response).await)
}

pub async fn login(router: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let response = send(router, post_json("/login", json!({ "email": email, "password": password }))).await;
    let status = response.status();
    (status, json_body(response).await)
}
