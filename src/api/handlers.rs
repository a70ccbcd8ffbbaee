//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStats, CacheStore, Clock, SharedCache, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, InvalidateDepsRequest,
    InvalidateRequest, InvalidateResponse, SetRequest, SetResponse,
};

/// Application state shared across all handlers.
///
/// Holds a shared store of JSON values.
#[derive(Debug)]
pub struct AppState<C = SystemClock> {
    pub cache: SharedCache<Value, C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<C: Clock> AppState<C> {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore<Value, C>) -> Self {
        Self {
            cache: cache.into_shared(),
        }
    }
}

impl AppState<SystemClock> {
    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(CacheStore::new(config)?))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value, linking it to any dependencies given.
pub async fn set_handler<C: Clock>(
    State(state): State<AppState<C>>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    if req.dependencies.is_empty() {
        cache.set(req.key.clone(), req.value, req.ttl_ms);
    } else {
        cache.set_with_dependencies(req.key.clone(), req.value, &req.dependencies, req.ttl_ms);
    }
    let dependencies = cache.dependencies_of(&req.key);

    Ok(Json(SetResponse::new(req.key, dependencies)))
}

/// Handler for GET /get/:key
///
/// A miss (absent or expired) maps to 404.
pub async fn get_handler<C: Clock>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: reads update recency and counters
    let mut cache = state.cache.write().await;
    let value = cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    let ttl_remaining_ms = cache.ttl_remaining_ms(&key).unwrap_or(0);

    Ok(Json(GetResponse::new(key, value, ttl_remaining_ms)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler<C: Clock>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.remove(&key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /invalidate
pub async fn invalidate_handler<C: Clock>(
    State(state): State<AppState<C>>,
    Json(req): Json<InvalidateRequest>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.write().await.invalidate(&req.pattern);
    Json(InvalidateResponse::new(removed))
}

/// Handler for POST /invalidate-deps
pub async fn invalidate_deps_handler<C: Clock>(
    State(state): State<AppState<C>>,
    Json(req): Json<InvalidateDepsRequest>,
) -> Json<InvalidateResponse> {
    let removed = state
        .cache
        .write()
        .await
        .invalidate_dependencies(&req.dependency);
    Json(InvalidateResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler<C: Clock>(State(state): State<AppState<C>>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /clear
pub async fn clear_handler<C: Clock>(State(state): State<AppState<C>>) -> Json<ClearResponse> {
    state.cache.write().await.clear();
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
