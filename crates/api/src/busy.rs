//! In-memory busy-sets gating duplicate user-triggered actions.
//!
//! While an activation (or similar per-item action) is in flight, a second
//! request for the same slot must be rejected rather than queued. Keys are
//! plain strings; the guard releases its key on drop, so an early return or
//! panic in a handler can never leave a slot stuck busy.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Set of in-flight action keys.
#[derive(Debug, Default)]
pub struct BusySet {
    inner: Mutex<HashSet<String>>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to mark `key` busy. Returns `None` if it already is.
    pub fn try_acquire(self: &Arc<Self>, key: impl Into<String>) -> Option<BusyGuard> {
        let key = key.into();
        let mut inner = self.inner.lock().expect("busy set poisoned");
        if inner.insert(key.clone()) {
            Some(BusyGuard {
                set: Arc::clone(self),
                key,
            })
        } else {
            None
        }
    }
}

/// RAII guard for one busy key.
pub struct BusyGuard {
    set: Arc<BusySet>,
    key: String,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.set
            .inner
            .lock()
            .expect("busy set poisoned")
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_while_guard_lives() {
        let set = Arc::new(BusySet::new());

        let guard = set.try_acquire("7:1:2:image").expect("first acquire");
        assert!(set.try_acquire("7:1:2:image").is_none());
        // A different slot is unaffected.
        assert!(set.try_acquire("7:1:2:audio").is_some());

        drop(guard);
        assert!(set.try_acquire("7:1:2:image").is_some());
    }

    #[test]
    fn guard_releases_on_drop_even_mid_scope() {
        let set = Arc::new(BusySet::new());
        {
            let _guard = set.try_acquire("k").unwrap();
            assert!(set.try_acquire("k").is_none());
        }
        assert!(set.try_acquire("k").is_some());
    }
}
