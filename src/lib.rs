//! Public API reporting whether a Telegram account was recently online.
//!
//! The account counts as recently online when Telegram reports it online, or
//! when it was last seen less than a minute ago. Answers are cached in a JSON
//! file for 15 minutes so Telegram is polled at most once per window:
//!
//! ```text
//! GET /data  ->  {"cache": true,  "online": false}   fresh record, no upstream call
//!            ->  {"cache": false, "online": true}    expired record, refreshed
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from file and environment
//! - [`error`]: Unified error types
//! - [`presence`]: Presence types, Telegram client and mock source
//! - [`cache`]: Status record and its JSON file store
//! - [`status`]: Cache-or-refresh logic behind `/data`
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus counters and latency timers
//! - [`utils`]: Utility functions

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod presence;
pub mod status;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
