//! Status cache record and its file store.

pub mod record;
pub mod store;

pub use record::{StatusCache, CACHE_TTL_MINUTES};
pub use store::CacheStore;
