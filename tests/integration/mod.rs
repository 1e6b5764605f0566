//! Integration tests for the presence API.
//!
//! The default tests run against the mock presence source and scratch
//! directories. Tests marked `#[ignore]` talk to Telegram and need an
//! authorized session; run them with:
//! `cargo test --test integration -- --ignored`

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use tg_presence::api::{create_router, AppState};
use tg_presence::cache::{CacheStore, StatusCache};
use tg_presence::config::Config;
use tg_presence::error::ConfigError;
use tg_presence::presence::{MockPresenceSource, Presence, PresenceSource, TelegramPresence};
use tg_presence::status::StatusService;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("tg-presence-it-{}", uuid::Uuid::new_v4()))
}

async fn get_data(state: AppState) -> (StatusCode, serde_json::Value) {
    let response = create_router(state)
        .oneshot(Request::builder().uri("/data").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

/// Walk a cache file through creation, cached reads and an expiry refresh.
#[tokio::test]
async fn cache_lifecycle_through_http() {
    let dir = scratch_dir();
    let cache_path = dir.join("cache").join("client_cache.json");
    let mock = Arc::new(MockPresenceSource::new(Presence::Online));
    let state = AppState::new(StatusService::new(
        CacheStore::new(&cache_path),
        mock.clone(),
    ));

    // No cache file: one upstream fetch populates it.
    let (status, body) = get_data(state.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "cache": true, "online": true }));
    assert_eq!(mock.calls(), 1);

    let raw: serde_json::Value =
        serde_json::from_slice(&tokio::fs::read(&cache_path).await.unwrap()).unwrap();
    assert_eq!(raw["cache"], false);
    assert_eq!(raw["status"], true);

    // Fresh record: no upstream call, stored status returned even if
    // upstream has changed since.
    mock.set_presence(Presence::Hidden);
    let (_, body) = get_data(state.clone()).await;
    assert_eq!(body, serde_json::json!({ "cache": true, "online": true }));
    assert_eq!(mock.calls(), 1);

    // Expired record: exactly one upstream call and a rewrite.
    let store = CacheStore::new(&cache_path);
    let mut record = store.load().await.unwrap().unwrap();
    record.expires = Utc::now() - Duration::minutes(1);
    store.save(&record).await.unwrap();

    let (_, body) = get_data(state.clone()).await;
    assert_eq!(body, serde_json::json!({ "cache": false, "online": false }));
    assert_eq!(mock.calls(), 2);

    let refreshed = store.load().await.unwrap().unwrap();
    assert!(refreshed.cache);
    assert!(!refreshed.status);
    assert!(refreshed.expires > Utc::now() + Duration::minutes(14));

    tokio::fs::remove_dir_all(&dir).await.ok();
}

/// An empty cache file is treated like a missing one.
#[tokio::test]
async fn empty_cache_file_is_repopulated() {
    let dir = scratch_dir();
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let cache_path = dir.join("client_cache.json");
    tokio::fs::write(&cache_path, b"").await.unwrap();

    let mock = Arc::new(MockPresenceSource::new(Presence::Offline {
        last_seen: Utc::now() - Duration::seconds(30),
    }));
    let service = StatusService::new(CacheStore::new(&cache_path), mock.clone());

    let response = service.current_status().await.unwrap();
    assert!(response.online);
    assert_eq!(mock.calls(), 1);

    let record: StatusCache = CacheStore::new(&cache_path).load().await.unwrap().unwrap();
    assert!(!record.cache);

    tokio::fs::remove_dir_all(&dir).await.ok();
}

/// Missing and malformed configuration files fail differently.
#[tokio::test]
async fn config_file_errors_are_distinct() {
    let dir = scratch_dir();
    tokio::fs::create_dir_all(&dir).await.unwrap();

    let missing = Config::load(&dir.join("config.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::NotFound { .. }));

    let broken = dir.join("broken.toml");
    tokio::fs::write(&broken, "[api\nid = 1").await.unwrap();
    let parse = Config::load(&broken).unwrap_err();
    assert!(matches!(parse, ConfigError::Parse { .. }));

    assert_ne!(missing.to_string(), parse.to_string());

    let good = dir.join("config.toml");
    tokio::fs::write(&good, "[api]\nid = 42\nhash = \"deadbeef\"\n")
        .await
        .unwrap();
    let config = Config::load(&good).unwrap();
    assert_eq!(config.api.id, 42);

    tokio::fs::remove_dir_all(&dir).await.ok();
}

/// Fetch the real account presence using `config/config.toml`.
#[tokio::test]
#[ignore = "requires config/config.toml and an authorized session"]
async fn test_fetch_real_presence() {
    let config = match Config::load_with_env(None) {
        Ok(c) => c,
        Err(e) => {
            println!("Skipping: {}", e);
            return;
        }
    };

    let telegram = TelegramPresence::connect(&config).await.unwrap();
    if !telegram.is_authorized().await.unwrap() {
        println!("Skipping: session not authorized");
        return;
    }

    let presence = telegram.fetch_presence().await;
    assert!(presence.is_ok(), "Failed to fetch presence: {:?}", presence.err());
    println!("Presence: {:?}", presence.unwrap());
}
