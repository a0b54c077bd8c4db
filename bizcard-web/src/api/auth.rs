//! Session authentication for bizcard-web
//!
//! One shared password, one class of user. A successful login issues a
//! random session id in the `bizcard_session` cookie; [`require_session`]
//! is the single gate in front of every directory operation.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use bizcard_common::db::{touch_activity, wipe_if_inactive};
use bizcard_common::time;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::ui::login_page;
use crate::{ApiResult, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "bizcard_session";

/// In-process map of live session ids to when they were last used
///
/// A session idle for longer than the inactivity threshold is dropped, so
/// the map only holds sessions that could still pass the gate.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
}

impl SessionStore {
    /// Issue a new session id
    pub async fn create(&self, max_idle: Duration) -> Uuid {
        self.create_at(time::now(), max_idle).await
    }

    /// Issue a session at an explicit instant, pruning expired ones first
    pub async fn create_at(&self, now: DateTime<Utc>, max_idle: Duration) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, last_seen| !time::exceeds(*last_seen, now, max_idle));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "Dropped expired sessions");
        }

        sessions.insert(id, now);
        id
    }

    /// True if `id` is live; refreshes its last-use time
    pub async fn validate(&self, id: &Uuid, max_idle: Duration) -> bool {
        self.validate_at(id, time::now(), max_idle).await
    }

    /// Validate against an explicit clock; an expired session is removed
    pub async fn validate_at(&self, id: &Uuid, now: DateTime<Utc>, max_idle: Duration) -> bool {
        let mut sessions = self.inner.write().await;
        let Some(last_seen) = sessions.get(id).copied() else {
            return false;
        };

        if time::exceeds(last_seen, now, max_idle) {
            sessions.remove(id);
            debug!(session = %id, "Session expired");
            return false;
        }

        sessions.insert(*id, now);
        true
    }

    /// Revoke a session; returns whether it existed
    pub async fn revoke(&self, id: &Uuid) -> bool {
        self.inner.write().await.remove(id).is_some()
    }

    /// Number of sessions held
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Request-scoped proof that the session gate passed
///
/// Inserted into request extensions by [`require_session`].
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub session: Uuid,
}

/// Session gate and maintenance pass
///
/// 1. No valid session: redirect to `/login`
/// 2. Wipe the directory if it has been idle past the threshold
/// 3. Dispatch with an [`AuthContext`] attached
/// 4. Record activity if the handler succeeded
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let session = match session_from_headers(request.headers()) {
        Some(id) => state
            .sessions
            .validate(&id, state.inactivity)
            .await
            .then_some(id),
        None => None,
    };
    let Some(session) = session else {
        debug!(path = %request.uri().path(), "No valid session, redirecting to login");
        return Ok(Redirect::to("/login").into_response());
    };

    wipe_if_inactive(&state.db, state.inactivity).await?;

    request.extensions_mut().insert(AuthContext { session });
    let response = next.run(request).await;

    if response.status().is_success() {
        if let Err(e) = touch_activity(&state.db).await {
            warn!(error = %e, "Failed to record activity");
        }
    }

    Ok(response)
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// GET /login
pub async fn login_form() -> Html<String> {
    Html(login_page(None))
}

/// POST /login
///
/// Wrong password re-renders the form with a notice; success sets the
/// session cookie and redirects to the UI.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Response> {
    if !state.password.verify(&form.password) {
        warn!("Login failed: incorrect password");
        return Ok(Html(login_page(Some("Incorrect password"))).into_response());
    }

    // Wipe check must precede the activity touch
    wipe_if_inactive(&state.db, state.inactivity).await?;
    let session = state.sessions.create(state.inactivity).await;
    touch_activity(&state.db).await?;
    info!(%session, "Login succeeded");

    Ok(([(SET_COOKIE, session_cookie(session))], Redirect::to("/")).into_response())
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session) = session_from_headers(&headers) {
        if state.sessions.revoke(&session).await {
            info!(%session, "Logged out");
        }
    }

    ([(SET_COOKIE, expired_cookie())], Redirect::to("/login")).into_response()
}

/// Extract the first well-formed session id from the Cookie header(s)
pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn session_cookie(session: Uuid) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, session)
}

fn expired_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}
