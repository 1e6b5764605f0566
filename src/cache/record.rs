//! The persisted status record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a fetched status stays valid.
pub const CACHE_TTL_MINUTES: i64 = 15;

/// Cached "recently online" determination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCache {
    /// Time after which the status must be fetched again.
    pub expires: DateTime<Utc>,
    /// False until the first refresh after the initial population.
    pub cache: bool,
    /// Last known "recently online" value.
    pub status: bool,
}

impl StatusCache {
    /// Record written on first use.
    pub fn initial(status: bool, now: DateTime<Utc>) -> Self {
        Self {
            expires: expiry_from(now),
            cache: false,
            status,
        }
    }

    /// Whether `now` is past the expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }

    /// Store a freshly fetched status and push the expiry forward.
    pub fn refresh(&mut self, status: bool, now: DateTime<Utc>) {
        self.status = status;
        self.expires = expiry_from(now);
        self.cache = true;
    }
}

fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(CACHE_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_record_expires_in_fifteen_minutes() {
        let now = Utc::now();
        let record = StatusCache::initial(true, now);

        assert_eq!(record.expires - now, Duration::minutes(15));
        assert!(!record.cache);
        assert!(record.status);
        assert!(!record.is_expired(now));
    }

    #[test]
    fn expiry_is_strictly_after() {
        let now = Utc::now();
        let record = StatusCache::initial(false, now);

        assert!(!record.is_expired(record.expires));
        assert!(record.is_expired(record.expires + Duration::seconds(1)));
    }

    #[test]
    fn refresh_marks_cache_and_moves_expiry() {
        let start = Utc::now();
        let mut record = StatusCache::initial(false, start);

        let later = start + Duration::minutes(20);
        record.refresh(true, later);

        assert!(record.cache);
        assert!(record.status);
        assert_eq!(record.expires, later + Duration::minutes(15));
    }

    #[test]
    fn serializes_with_expected_field_names() {
        let record = StatusCache {
            expires: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            cache: true,
            status: false,
        };
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["expires"], "2023-11-14T22:13:20Z");
        assert_eq!(value["cache"], true);
        assert_eq!(value["status"], false);
    }
}
