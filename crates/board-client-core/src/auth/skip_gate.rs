use std::sync::Arc;

use super::storage::TabStorage;

/// Storage key for the skip flag, kept next to the token
pub(crate) const SKIP_VERIFY_KEY: &str = "skipAuthVerifyOnce";

/// One-shot flag that suppresses the next startup verification.
///
/// Set by the login flow right after it stores a fresh token, consumed by
/// `StartupVerifier` at most once.
pub struct SkipOnceGate {
    storage: Arc<dyn TabStorage>,
}

impl SkipOnceGate {
    pub fn new(storage: Arc<dyn TabStorage>) -> Self {
        Self { storage }
    }

    /// Mark the next verification as skippable. Idempotent.
    pub fn set(&self) {
        self.storage.set_item(SKIP_VERIFY_KEY, "true");
    }

    /// Clear the flag and report whether it was set
    pub fn consume_once(&self) -> bool {
        self.storage.take_item(SKIP_VERIFY_KEY).is_some()
    }

    pub fn is_set(&self) -> bool {
        self.storage.get_item(SKIP_VERIFY_KEY).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStorage;

    #[test]
    fn test_consume_once_per_set() {
        let gate = SkipOnceGate::new(Arc::new(MemoryStorage::new()));
        assert!(!gate.consume_once());

        gate.set();
        gate.set(); // idempotent
        assert!(gate.consume_once());
        assert!(!gate.consume_once());
        assert!(!gate.consume_once());

        gate.set();
        assert!(gate.consume_once());
        assert!(!gate.is_set());
    }
}
