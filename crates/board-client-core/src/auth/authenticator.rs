use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::warn;

use super::SessionStore;

/// Derives the `Authorization` header for outbound requests.
///
/// The store is read each time a request is built, never cached.
pub struct RequestAuthenticator {
    store: Arc<SessionStore>,
}

impl RequestAuthenticator {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// `Bearer <token>` for an explicit token, or for the stored one when
    /// `token` is None. None when there is no token.
    pub fn authorization(&self, token: Option<&str>) -> Option<HeaderValue> {
        let token = match token {
            Some(t) => t.to_string(),
            None => self.store.get()?,
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(e) => {
                warn!(error = %e, "Session token is not a valid header value");
                None
            }
        }
    }

    /// Headers to attach to a request built right now
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply(&mut headers);
        headers
    }

    /// Add the authorization header to `headers` if a session exists
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(value) = self.authorization(None) {
            headers.insert(header::AUTHORIZATION, value);
        }
    }
}
