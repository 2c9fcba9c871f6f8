use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, warn};

use super::storage::TabStorage;

/// Storage key holding the bearer token
pub(crate) const TOKEN_KEY: &str = "jwtToken";

/// Claims we read from the token payload. Signature is not checked here;
/// the server is the only party that validates tokens.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: Option<String>,
}

/// Owns the session token.
///
/// The stored value is the only source of truth: nothing caches a copy, so a
/// token set or cleared here is seen by the very next request.
pub struct SessionStore {
    storage: Arc<dyn TabStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TabStorage>) -> Self {
        Self { storage }
    }

    /// Get the current token, if a non-empty one is stored
    pub fn get(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Store a token. An empty token clears the session instead.
    pub fn set(&self, token: &str) {
        if token.is_empty() {
            self.clear();
            return;
        }
        self.storage.set_item(TOKEN_KEY, token);
        debug!("Session token stored");
    }

    pub fn clear(&self) {
        self.storage.remove_item(TOKEN_KEY);
        debug!("Session token cleared");
    }

    pub fn is_logged_in(&self) -> bool {
        self.get().is_some()
    }

    /// Username (`sub` claim) of the current token.
    /// Returns None when there is no session or the token can't be decoded.
    pub fn current_username(&self) -> Option<String> {
        let token = self.get()?;
        match decode_subject(&token) {
            Ok(sub) => sub,
            Err(e) => {
                warn!(error = %e, "Failed to decode session token");
                None
            }
        }
    }
}

fn decode_subject(token: &str) -> Result<Option<String>> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Token is not a JWT"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .context("Token payload is not base64url")?;
    let claims: TokenClaims =
        serde_json::from_slice(&bytes).context("Token payload is not a JSON object")?;
    Ok(claims.sub)
}
