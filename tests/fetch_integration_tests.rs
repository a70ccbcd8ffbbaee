//! Integration Tests for the cached fetch decorator
//!
//! Runs a local axum upstream and drives `CachedFetcher` against it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use learnspark_cache::cache::{CacheStore, ManualClock};
use learnspark_cache::fetch::{CachedFetcher, CachedResponse, FetchOptions};
use learnspark_cache::{CacheError, Config};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

const TTL_MS: u64 = 1_000;
const STALE_TTL_MS: u64 = 60_000;

// == Upstream ==

#[derive(Default)]
struct Upstream {
    requests: AtomicUsize,
    failing: AtomicBool,
}

impl Upstream {
    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

async fn list_students(State(upstream): State<Arc<Upstream>>) -> (StatusCode, Json<Value>) {
    upstream.requests.fetch_add(1, Ordering::SeqCst);
    if upstream.failing.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "maintenance"})),
        );
    }
    (StatusCode::OK, Json(json!([{"id": 1, "name": "Ada"}])))
}

async fn create_student(State(upstream): State<Arc<Upstream>>) -> StatusCode {
    upstream.requests.fetch_add(1, Ordering::SeqCst);
    StatusCode::CREATED
}

async fn missing(State(upstream): State<Arc<Upstream>>) -> StatusCode {
    upstream.requests.fetch_add(1, Ordering::SeqCst);
    StatusCode::NOT_FOUND
}

async fn spawn_upstream() -> (String, Arc<Upstream>, JoinHandle<()>) {
    let upstream = Arc::new(Upstream::default());
    let app = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/missing", get(missing))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), upstream, handle)
}

fn create_fetcher() -> (CachedFetcher<ManualClock>, ManualClock) {
    create_fetcher_with(Config::default())
}

fn create_fetcher_with(config: Config) -> (CachedFetcher<ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    let store = CacheStore::with_clock(&config, clock.clone()).unwrap();
    // No pooled connections, so a stopped upstream is unreachable right away
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    let options = FetchOptions {
        ttl_ms: TTL_MS,
        stale_ttl_ms: STALE_TTL_MS,
    };
    (
        CachedFetcher::new(client, store.into_shared(), options),
        clock,
    )
}

// == Tests ==

#[tokio::test]
async fn test_get_is_served_from_cache_when_fresh() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, _) = create_fetcher();
    let url = format!("{base}/students");

    let first = fetcher.get(&url).await.unwrap();
    let second = fetcher.get(&url).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.status, 200);
    assert!(!second.stale);
    assert_eq!(upstream.requests(), 1);
    let body: Value = second.json().unwrap();
    assert_eq!(body[0]["name"], "Ada");

    server.abort();
}

#[tokio::test]
async fn test_get_refetches_after_ttl() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, clock) = create_fetcher();
    let url = format!("{base}/students");

    fetcher.get(&url).await.unwrap();
    clock.advance(TTL_MS + 1);
    fetcher.get(&url).await.unwrap();

    assert_eq!(upstream.requests(), 2);

    server.abort();
}

#[tokio::test]
async fn test_server_error_falls_back_to_stale_copy() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, clock) = create_fetcher();
    let url = format!("{base}/students");

    let fresh = fetcher.get(&url).await.unwrap();
    upstream.failing.store(true, Ordering::SeqCst);
    clock.advance(TTL_MS + 1);

    let served = fetcher.get(&url).await.unwrap();

    assert!(served.stale);
    assert_eq!(served.status, 200);
    assert_eq!(served.body, fresh.body);
    assert_eq!(upstream.requests(), 2);

    server.abort();
}

#[tokio::test]
async fn test_server_error_without_stale_copy_is_returned() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, _) = create_fetcher();
    upstream.failing.store(true, Ordering::SeqCst);

    let served = fetcher.get(&format!("{base}/students")).await.unwrap();

    assert_eq!(served.status, 503);
    assert!(!served.stale);

    server.abort();
}

#[tokio::test]
async fn test_transport_failure_falls_back_to_stale_copy() {
    let (base, _, server) = spawn_upstream().await;
    let (fetcher, clock) = create_fetcher();
    let url = format!("{base}/students");

    fetcher.get(&url).await.unwrap();
    server.abort();
    let _ = server.await;
    clock.advance(TTL_MS + 1);

    let served = fetcher.get(&url).await.unwrap();
    assert!(served.stale);
    assert_eq!(served.status, 200);
}

#[tokio::test]
async fn test_transport_failure_after_stale_ttl_is_an_error() {
    let (base, _, server) = spawn_upstream().await;
    let (fetcher, clock) = create_fetcher();
    let url = format!("{base}/students");

    fetcher.get(&url).await.unwrap();
    server.abort();
    let _ = server.await;
    clock.advance(STALE_TTL_MS + 1);

    let result = fetcher.get(&url).await;
    assert!(matches!(result, Err(CacheError::Upstream(_))));
}

#[tokio::test]
async fn test_non_success_responses_are_not_cached() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, _) = create_fetcher();
    let url = format!("{base}/missing");

    let first = fetcher.get(&url).await.unwrap();
    fetcher.get(&url).await.unwrap();

    assert_eq!(first.status, 404);
    assert_eq!(upstream.requests(), 2);
    assert!(fetcher.cache().read().await.is_empty());

    server.abort();
}

#[tokio::test]
async fn test_mutation_bypasses_cache_and_invalidates() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, _) = create_fetcher();
    let url = format!("{base}/students");

    fetcher.get(&url).await.unwrap();
    assert_eq!(fetcher.cache().read().await.len(), 2);

    let created: CachedResponse = fetcher
        .send(Method::POST, &url, Some(&json!({"name": "Grace"})))
        .await
        .unwrap();
    assert_eq!(created.status, 201);
    assert!(fetcher.cache().read().await.is_empty());

    fetcher.get(&url).await.unwrap();
    assert_eq!(upstream.requests(), 3);

    server.abort();
}

#[tokio::test]
async fn test_send_get_uses_cache() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, _) = create_fetcher();
    let url = format!("{base}/students");

    fetcher.send(Method::GET, &url, None).await.unwrap();
    fetcher.send(Method::GET, &url, None).await.unwrap();

    assert_eq!(upstream.requests(), 1);

    server.abort();
}

#[tokio::test]
async fn test_fresh_copy_survives_a_single_slot_cache() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, _) = create_fetcher_with(Config::default().with_max_entries(1));
    let url = format!("{base}/students");

    fetcher.get(&url).await.unwrap();
    let second = fetcher.get(&url).await.unwrap();

    assert!(!second.stale);
    assert_eq!(upstream.requests(), 1);
    assert_eq!(fetcher.cache().read().await.len(), 1);

    server.abort();
}

#[tokio::test]
async fn test_two_slots_hold_both_copies_of_a_url() {
    let (base, upstream, server) = spawn_upstream().await;
    let (fetcher, clock) = create_fetcher_with(Config::default().with_max_entries(2));
    let url = format!("{base}/students");

    fetcher.get(&url).await.unwrap();
    fetcher.get(&url).await.unwrap();
    assert_eq!(upstream.requests(), 1);

    upstream.failing.store(true, Ordering::SeqCst);
    clock.advance(TTL_MS + 1);
    let served = fetcher.get(&url).await.unwrap();

    assert!(served.stale);
    assert_eq!(served.status, 200);

    server.abort();
}
