//! Mock presence source for unit testing.
//!
//! Returns a configurable presence without touching the network and counts
//! how many times it was asked.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::UpstreamError;

use super::types::Presence;
use super::PresenceSource;

/// Mock presence source for testing.
#[derive(Debug)]
pub struct MockPresenceSource {
    /// Presence to report.
    presence: Mutex<Presence>,
    /// Number of fetches made.
    calls: AtomicUsize,
    /// Whether fetches should fail.
    fail: AtomicBool,
}

impl MockPresenceSource {
    /// Create a mock reporting `presence`.
    pub fn new(presence: Presence) -> Self {
        Self {
            presence: Mutex::new(presence),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Create a mock whose every fetch fails.
    pub fn failing() -> Self {
        let mock = Self::new(Presence::Hidden);
        mock.set_failing(true);
        mock
    }

    /// Change the reported presence.
    pub fn set_presence(&self, presence: Presence) {
        *self.presence.lock().unwrap() = presence;
    }

    /// Toggle failure mode.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockPresenceSource {
    fn default() -> Self {
        Self::new(Presence::Online)
    }
}

#[async_trait]
impl PresenceSource for MockPresenceSource {
    async fn fetch_presence(&self) -> Result<Presence, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(UpstreamError::Request("mock presence failure".to_string()));
        }

        Ok(*self.presence.lock().unwrap())
    }
}
