//! bizcard-web library - HTTP surface of the employee directory
//!
//! Session-gated routes for bulk import, listing, QR cards and contact
//! downloads. Exposed as a library so integration tests can drive the
//! router directly.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use bizcard_common::api::PasswordHash;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Largest accepted CSV upload
pub const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Salted hash of the shared login password
    pub password: Arc<PasswordHash>,
    /// Live login sessions
    pub sessions: api::auth::SessionStore,
    /// Idle period after which the directory is wiped
    pub inactivity: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, password: PasswordHash, inactivity: Duration) -> Self {
        Self {
            db,
            password: Arc::new(password),
            sessions: api::auth::SessionStore::default(),
            inactivity,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Everything except login, logout and health sits behind the session gate.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Protected routes (require a session)
    let protected = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route(
            "/upload",
            post(api::upload_csv).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/api/employees", get(api::list_employees))
        .route("/add_employee", post(api::add_employee))
        .route("/generate_qr/:name", get(api::generate_qr))
        .route("/vcard/:name", get(api::download_vcard))
        .route("/download_all_qr", get(api::download_all_qr))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    // Public routes (no session)
    let public = Router::new()
        .route("/login", get(api::login_form).post(api::login))
        .route("/logout", get(api::logout))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
