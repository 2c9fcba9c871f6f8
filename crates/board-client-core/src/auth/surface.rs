use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// The UI hooks the session code needs from whatever front end hosts it.
pub trait LoginSurface: Send + Sync {
    /// Navigate the application to the login screen
    fn redirect_to_login(&self);

    /// Show a message to the user
    fn notify(&self, message: &str);

    /// Whether the login screen is what the user currently sees
    fn is_on_login(&self) -> bool;
}

/// A surface that only records what was asked of it.
///
/// Useful for headless embedding and for tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    on_login: AtomicBool,
    redirects: Mutex<usize>,
    notices: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that starts on the login screen
    pub fn on_login() -> Self {
        let surface = Self::default();
        surface.on_login.store(true, Ordering::SeqCst);
        surface
    }

    pub fn redirect_count(&self) -> usize {
        *self.redirects.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl LoginSurface for RecordingSurface {
    fn redirect_to_login(&self) {
        *self.redirects.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.on_login.store(true, Ordering::SeqCst);
    }

    fn notify(&self, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }

    fn is_on_login(&self) -> bool {
        self.on_login.load(Ordering::SeqCst)
    }
}
