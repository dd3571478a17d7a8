//! Mock session probe for unit testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::handle_arrival::SessionProbe;

/// A probe that reports a fixed lock state and counts how often it is asked.
pub struct MockSessionProbe {
    locked: bool,
    probes: AtomicUsize,
}

impl MockSessionProbe {
    /// A probe that always reports the given lock state.
    pub fn reporting(locked: bool) -> Self {
        Self {
            locked,
            probes: AtomicUsize::new(0),
        }
    }

    /// How many times `any_session_locked` has been called.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }
}

impl SessionProbe for MockSessionProbe {
    fn any_session_locked(&self) -> bool {
        self.probes.fetch_add(1, Ordering::Relaxed);
        self.locked
    }
}
