//! Presence types reported by the upstream client.

use chrono::{DateTime, Duration, Utc};

/// Grace window after the last-seen timestamp during which the account still
/// counts as recently online.
pub const RECENTLY_ONLINE_SECONDS: i64 = 60;

/// Account presence as reported by Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Currently online.
    Online,
    /// Offline, with the exact time the account was last seen.
    Offline {
        /// Last time the account was online.
        last_seen: DateTime<Utc>,
    },
    /// Status withheld by privacy settings, coarse ("last week"), or empty.
    Hidden,
}

impl Presence {
    /// Online now, or last seen less than [`RECENTLY_ONLINE_SECONDS`] before `now`.
    pub fn is_recently_online(&self, now: DateTime<Utc>) -> bool {
        match self {
            Presence::Online => true,
            Presence::Offline { last_seen } => {
                now - *last_seen < Duration::seconds(RECENTLY_ONLINE_SECONDS)
            }
            Presence::Hidden => false,
        }
    }
}
