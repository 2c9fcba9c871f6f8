//! Response-side check for session invalidation.
//!
//! Every response the API client receives, success or failure, is reduced to
//! a `ResponseOutcome` and handed to `GlobalResponseGuard::inspect` before the
//! caller sees it. The decision itself is the pure function `decide`.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, info};

use super::surface::LoginSurface;
use super::SessionStore;
use crate::api::endpoints::{LOGIN_PATH, ME_PATH, REGISTER_PATH};

/// Shown when an authenticated request is rejected
pub const SESSION_EXPIRED_NOTICE: &str =
    "Your login has expired or you do not have permission. Please log in again.";

/// Auth-flow endpoints whose failures are handled by the caller
const AUTH_FLOW_PATHS: [&str; 3] = [LOGIN_PATH, REGISTER_PATH, ME_PATH];

/// What the guard knows about one finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub url: String,
    /// None when the request failed before a response arrived
    pub status: Option<StatusCode>,
    /// Whether the request was sent with an `Authorization` header
    pub had_authorization: bool,
}

impl ResponseOutcome {
    pub fn new(url: impl Into<String>, status: Option<StatusCode>, had_authorization: bool) -> Self {
        Self {
            url: url.into(),
            status,
            had_authorization,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    PassThrough,
    Invalidate,
}

/// 401 and 403 are the only statuses that can mean the session is dead
pub fn is_invalidation_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

pub fn is_auth_flow_url(url: &str) -> bool {
    AUTH_FLOW_PATHS.iter().any(|path| url.contains(path))
}

/// Decide whether `outcome` invalidates the session.
///
/// Invalidate only when all hold: the URL is not an auth-flow endpoint, the
/// status is 401/403, the request carried a token, and a session exists now.
pub fn decide(outcome: &ResponseOutcome, session_active: bool) -> GuardAction {
    if is_auth_flow_url(&outcome.url) {
        return GuardAction::PassThrough;
    }
    match outcome.status {
        Some(status) if is_invalidation_status(status) => {}
        _ => return GuardAction::PassThrough,
    }
    if !outcome.had_authorization || !session_active {
        return GuardAction::PassThrough;
    }
    GuardAction::Invalidate
}

/// Applies `decide` against the live session and acts on it.
///
/// Stateless between calls; a second invalidation after the session is gone
/// is a no-op because the session check fails.
pub struct GlobalResponseGuard {
    store: Arc<SessionStore>,
    surface: Arc<dyn LoginSurface>,
}

impl GlobalResponseGuard {
    pub fn new(store: Arc<SessionStore>, surface: Arc<dyn LoginSurface>) -> Self {
        Self { store, surface }
    }

    pub fn inspect(&self, outcome: &ResponseOutcome) -> GuardAction {
        let action = decide(outcome, self.store.is_logged_in());
        match action {
            GuardAction::PassThrough => {
                debug!(url = %outcome.url, status = ?outcome.status, "Response passed through guard");
            }
            GuardAction::Invalidate => {
                info!(url = %outcome.url, status = ?outcome.status, "Session invalidated by server");
                self.store.clear();
                self.surface.notify(SESSION_EXPIRED_NOTICE);
                self.surface.redirect_to_login();
            }
        }
        action
    }
}
