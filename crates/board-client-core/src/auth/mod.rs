//! Authentication module for managing the client-side session.
//!
//! This module provides:
//! - `SessionStore`: the bearer token, kept in transient tab storage
//! - `RequestAuthenticator`: `Authorization` header derivation per request
//! - `GlobalResponseGuard`: logs the user out when the server rejects their token
//! - `SkipOnceGate` / `StartupVerifier`: the boot-time session check
//!
//! `SessionController` wires them over one storage.

pub mod authenticator;
pub mod guard;
pub mod session;
pub mod skip_gate;
pub mod storage;
pub mod surface;
pub mod verifier;

use std::sync::Arc;

pub use authenticator::RequestAuthenticator;
pub use guard::{GlobalResponseGuard, GuardAction, ResponseOutcome};
pub use session::SessionStore;
pub use skip_gate::SkipOnceGate;
pub use storage::{FileStorage, MemoryStorage, TabStorage};
pub use surface::{LoginSurface, RecordingSurface};
pub use verifier::{StartupVerifier, VerifyOutcome};

use crate::api::ApiClient;

/// Owns every session component for one tab.
pub struct SessionController {
    store: Arc<SessionStore>,
    gate: Arc<SkipOnceGate>,
    authenticator: RequestAuthenticator,
    guard: GlobalResponseGuard,
    verifier: StartupVerifier,
}

impl SessionController {
    pub fn new(storage: Arc<dyn TabStorage>, surface: Arc<dyn LoginSurface>) -> Self {
        let store = Arc::new(SessionStore::new(storage.clone()));
        let gate = Arc::new(SkipOnceGate::new(storage));
        Self {
            authenticator: RequestAuthenticator::new(store.clone()),
            guard: GlobalResponseGuard::new(store.clone(), surface.clone()),
            verifier: StartupVerifier::new(store.clone(), gate.clone(), surface),
            store,
            gate,
        }
    }

    /// In-memory session, e.g. for embedding or tests
    pub fn in_memory(surface: Arc<dyn LoginSurface>) -> Self {
        Self::new(Arc::new(MemoryStorage::new()), surface)
    }

    /// Record a successful login: store the token, then skip the next
    /// startup check. An empty token starts no session and sets no flag.
    pub fn on_login_success(&self, token: &str) {
        self.store.set(token);
        if self.store.is_logged_in() {
            self.gate.set();
        }
    }

    pub fn logout(&self) {
        self.store.clear();
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    pub fn current_username(&self) -> Option<String> {
        self.store.current_username()
    }

    /// Run the boot-time session check through `client`
    pub async fn verify_on_start(&self, client: &ApiClient) -> VerifyOutcome {
        self.verifier.run(client).await
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn skip_gate(&self) -> &SkipOnceGate {
        &self.gate
    }

    pub fn authenticator(&self) -> &RequestAuthenticator {
        &self.authenticator
    }

    pub fn guard(&self) -> &GlobalResponseGuard {
        &self.guard
    }
}
