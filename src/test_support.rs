//! Helpers for driving the real router in tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{app::build_app, state::AppState, storage::MemoryStorage};

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub json: Value,
}

impl TestResponse {
    /// `name=value` of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .and_then(|v| v.split(';').next())
            .map(|v| v.to_string())
    }
}

pub async fn test_app(enable_demo_sqli: bool) -> (Router, AppState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::default());
    let state = AppState::fake_with(enable_demo_sqli, storage.clone()).await;
    (build_app(state.clone()), state, storage)
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        bytes,
        json,
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// One multipart part: name, optional file name, content.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart_post(uri: &str, parts: &[Part<'_>], cookie: Option<&str>) -> Request<Body> {
    const BOUNDARY: &str = "recipebox-test-boundary";
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body)).expect("request")
}

/// Registers `username` and returns the `session=...` cookie from logging in.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");
    let res = send(app, form_post("/register", &body, None)).await;
    assert_eq!(res.status, StatusCode::CREATED, "register: {}", res.json);
    let res = send(app, form_post("/login", &body, None)).await;
    assert_eq!(res.status, StatusCode::OK, "login: {}", res.json);
    res.session_cookie().expect("login sets a session cookie")
}

/// Posts a text-only recipe as the given session and returns its id.
pub async fn add_recipe(app: &Router, cookie: &str, title: &str) -> i64 {
    let res = send(
        app,
        multipart_post(
            "/add",
            &[
                ("title", None, title.as_bytes()),
                ("description", None, b"Mix and cook."),
            ],
            Some(cookie),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "add: {}", res.json);
    res.json["id"].as_i64().expect("recipe id")
}
