use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Keys of submissions currently being forwarded to the backend.
///
/// A second submission for a key that is still in flight is refused rather
/// than sent. Different keys never block each other and nothing orders their
/// responses.
#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

/// Releases its key when dropped.
pub struct SubmissionGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the same action is already running.
    pub fn begin(&self, key: impl Into<String>) -> Option<SubmissionGuard> {
        let key = key.into();
        let mut keys = self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !keys.insert(key.clone()) {
            tracing::debug!(key = %key, "duplicate submission refused");
            return None;
        }
        Some(SubmissionGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    #[cfg(test)]
    pub fn is_running(&self, key: &str) -> bool {
        self.keys
            .lock()
            .map(|keys| keys.contains(key))
            .unwrap_or(false)
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        let mut keys = self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        keys.remove(&self.key);
    }
}
