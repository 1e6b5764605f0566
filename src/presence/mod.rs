//! Upstream presence lookups.
//!
//! This module handles:
//! - Presence types and the "recently online" heuristic
//! - The Telegram client wrapper
//! - Mock source for testing

use async_trait::async_trait;

use crate::error::UpstreamError;

pub mod client;
pub mod mock;
pub mod types;

pub use client::{CodeOutcome, TelegramPresence};
pub use mock::MockPresenceSource;
pub use types::{Presence, RECENTLY_ONLINE_SECONDS};

/// Something that can report the configured account's current presence.
#[async_trait]
pub trait PresenceSource: Send + Sync {
    /// Fetch the account's presence from upstream.
    async fn fetch_presence(&self) -> Result<Presence, UpstreamError>;
}
