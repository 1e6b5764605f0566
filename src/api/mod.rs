//! HTTP API module for the status, health, metrics and OpenAPI endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{ApiDoc, AppState};
pub use routes::create_router;
