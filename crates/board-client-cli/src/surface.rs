use std::sync::atomic::{AtomicBool, Ordering};

use board_client_core::LoginSurface;

/// The terminal acts as the UI: notices go to stderr and "the login screen"
/// means the current command is `login` or `register`.
pub struct TerminalSurface {
    on_login: AtomicBool,
}

impl TerminalSurface {
    pub fn new(on_login: bool) -> Self {
        Self {
            on_login: AtomicBool::new(on_login),
        }
    }
}

impl LoginSurface for TerminalSurface {
    fn redirect_to_login(&self) {
        if !self.on_login.swap(true, Ordering::SeqCst) {
            eprintln!("Run `board login` to sign in again.");
        }
    }

    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn is_on_login(&self) -> bool {
        self.on_login.load(Ordering::SeqCst)
    }
}
