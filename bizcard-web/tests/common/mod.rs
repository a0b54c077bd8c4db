//! Shared helpers for bizcard-web integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bizcard_common::api::hash_password;
use bizcard_common::db::init_database;
use bizcard_common::time::{days, DEFAULT_INACTIVITY_DAYS};
use bizcard_web::{build_router, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

pub const PASSWORD: &str = "open sesame";
pub const BOUNDARY: &str = "bizcard-test-boundary";

/// Router over a fresh database; keep the `TempDir` alive for the test
pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Should create temp dir");
        let db = init_database(&dir.path().join("bizcard.db"))
            .await
            .expect("Should init database");

        let state = AppState::new(
            db.clone(),
            hash_password(PASSWORD),
            days(DEFAULT_INACTIVITY_DAYS),
        );

        Self {
            router: build_router(state),
            db,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    /// Log in and return the `name=value` cookie pair
    pub async fn login(&self) -> String {
        let response = self.send(login_request(PASSWORD)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Login should set a cookie")
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub fn login_request(password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("password={}", password.replace(' ', "+"))))
        .unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart body with one field; `filename: None` omits the file part entirely
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(filename) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                field, filename
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn extract_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Should parse JSON")
}

/// Export with the fixed column layout: email at 1, name at 3, mobile at 8
pub fn csv_export(rows: &[(&str, &str)]) -> String {
    let mut csv = String::from("id,email,title,name,dept,designation,faculty,school,mobile\n");
    for (i, (email, name)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},,{},,Lecturer,Science,Physics,0400 000 00{}\n",
            i + 1,
            email,
            name,
            i
        ));
    }
    csv
}
