use std::sync::Arc;

use anyhow::Error;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::guard::is_invalidation_status;
use super::surface::LoginSurface;
use super::{SessionStore, SkipOnceGate};
use crate::api::{ApiClient, ApiError};

/// Shown when the boot-time probe rejects the stored token
pub const STARTUP_INVALID_NOTICE: &str =
    "Your login has expired or is no longer valid. Please log in again.";

/// Terminal state of one startup verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No token stored; nothing to verify
    NoToken,
    /// Login just happened; the skip flag was consumed
    SkipRequested,
    /// The probe accepted the token
    Confirmed,
    /// Token rejected while already on the login screen
    InvalidatedSilent,
    /// Token rejected; user notified and sent to login
    InvalidatedNoisy,
    /// Probe failed for a reason that says nothing about the token
    Indeterminate,
}

/// Checks once at boot whether a stored token is still accepted.
pub struct StartupVerifier {
    store: Arc<SessionStore>,
    gate: Arc<SkipOnceGate>,
    surface: Arc<dyn LoginSurface>,
}

impl StartupVerifier {
    pub fn new(
        store: Arc<SessionStore>,
        gate: Arc<SkipOnceGate>,
        surface: Arc<dyn LoginSurface>,
    ) -> Self {
        Self {
            store,
            gate,
            surface,
        }
    }

    /// Run the verification using `client` for the identity probe
    pub async fn run(&self, client: &ApiClient) -> VerifyOutcome {
        if self.store.get().is_none() {
            debug!("No session token at startup");
            return VerifyOutcome::NoToken;
        }

        if self.gate.consume_once() {
            debug!("Skipping startup verification after login");
            return VerifyOutcome::SkipRequested;
        }

        let result = client.me().await.map(|identity| {
            debug!(username = %identity.username, "Session confirmed");
        });
        self.settle(result)
    }

    /// Act on the probe result
    pub(crate) fn settle(&self, result: anyhow::Result<()>) -> VerifyOutcome {
        let error = match result {
            Ok(()) => return VerifyOutcome::Confirmed,
            Err(e) => e,
        };

        match probe_status(&error) {
            Some(status) if is_invalidation_status(status) => {
                self.store.clear();
                if self.surface.is_on_login() {
                    info!(%status, "Stored session rejected, cleared quietly");
                    VerifyOutcome::InvalidatedSilent
                } else {
                    info!(%status, "Stored session rejected");
                    self.surface.notify(STARTUP_INVALID_NOTICE);
                    self.surface.redirect_to_login();
                    VerifyOutcome::InvalidatedNoisy
                }
            }
            _ => {
                warn!(error = %error, "Startup session check failed (ignored)");
                VerifyOutcome::Indeterminate
            }
        }
    }
}

fn probe_status(error: &Error) -> Option<StatusCode> {
    error.downcast_ref::<ApiError>().and_then(ApiError::status)
}
