//! Cached "recently online" lookups.
//!
//! Each request reads the cache file. A missing record is populated from
//! upstream; an expired one is refreshed and rewritten; a fresh one is
//! returned as is without contacting Telegram.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::cache::{CacheStore, StatusCache};
use crate::error::Result;
use crate::metrics;
use crate::presence::PresenceSource;

/// Body of `GET /data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// True when the answer came from the cache without an upstream fetch.
    pub cache: bool,
    /// Whether the account was recently online.
    pub online: bool,
}

/// Long-lived service answering status requests.
#[derive(Clone)]
pub struct StatusService {
    store: CacheStore,
    source: Arc<dyn PresenceSource>,
}

impl StatusService {
    /// Create the service from a cache store and an upstream source.
    pub fn new(store: CacheStore, source: Arc<dyn PresenceSource>) -> Self {
        Self { store, source }
    }

    /// The cache store in use.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Answer a status request at the current time.
    pub async fn current_status(&self) -> Result<StatusResponse> {
        self.status_at(Utc::now()).await
    }

    /// Answer a status request as if the time were `now`.
    pub async fn status_at(&self, now: DateTime<Utc>) -> Result<StatusResponse> {
        let mut record = match self.store.load().await? {
            Some(record) => record,
            None => self.populate(now).await?,
        };

        if record.is_expired(now) {
            let online = self.fetch_online(now).await?;
            record.refresh(online, now);
            self.store.save(&record).await?;

            metrics::inc_cache_refreshes();
            info!(online, expires = %record.expires, "status refreshed");
            return Ok(StatusResponse {
                cache: false,
                online,
            });
        }

        metrics::inc_cache_hits();
        debug!(online = record.status, expires = %record.expires, "serving cached status");
        Ok(StatusResponse {
            cache: true,
            online: record.status,
        })
    }

    /// Write the first record from a fresh upstream fetch.
    async fn populate(&self, now: DateTime<Utc>) -> Result<StatusCache> {
        let online = self.fetch_online(now).await?;
        let record = StatusCache::initial(online, now);
        self.store.save(&record).await?;

        metrics::inc_cache_populations();
        info!(online, path = %self.store.path().display(), "status cache created");
        Ok(record)
    }

    async fn fetch_online(&self, now: DateTime<Utc>) -> Result<bool> {
        let _timer = metrics::timer_upstream_fetch();

        let presence = self.source.fetch_presence().await.map_err(|e| {
            metrics::inc_upstream_failures();
            warn!(error = %e, "presence fetch failed");
            e
        })?;

        Ok(presence.is_recently_online(now))
    }
}
