//! Cached Fetch Module
//!
//! Opt-in decorator around a `reqwest::Client` that serves GET responses from
//! a shared cache and falls back to the last good copy when the network fails.
//!
//! Nothing global is patched: only requests issued through a
//! [`CachedFetcher`] participate.

use reqwest::{header::CONTENT_TYPE, Client, Method, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{Clock, SharedCache, SystemClock};
use crate::error::Result;

/// Key prefix for fresh responses.
pub const FRESH_PREFIX: &str = "fetch:";
/// Key prefix for the long-lived fallback copy.
pub const STALE_PREFIX: &str = "fetch-stale:";

// == Cached Response ==
/// A response body captured for caching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
    /// Set when served from the fallback copy after an upstream failure
    #[serde(default)]
    pub stale: bool,
}

impl CachedResponse {
    async fn read(response: Response) -> Result<Self> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(Self {
            status,
            content_type,
            body,
            stale: false,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Parses the body as JSON.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

// == Fetch Options ==
/// Cache policy for a [`CachedFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// How long a response is served without contacting the network
    pub ttl_ms: u64,
    /// How long the fallback copy is kept for upstream failures
    pub stale_ttl_ms: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            ttl_ms: 300_000,
            stale_ttl_ms: 86_400_000,
        }
    }
}

// == Cached Fetcher ==
/// HTTP client decorator backed by a shared cache.
///
/// Each cached URL takes two entries of the cache's capacity, the fresh copy
/// and the stale fallback, so size `max_entries` to at least twice the number
/// of URLs that should stay cached. When space runs short the fallback copies
/// go first, because they are written before the fresh ones.
#[derive(Debug, Clone)]
pub struct CachedFetcher<C = SystemClock> {
    client: Client,
    cache: SharedCache<CachedResponse, C>,
    options: FetchOptions,
}

impl<C: Clock> CachedFetcher<C> {
    pub fn new(client: Client, cache: SharedCache<CachedResponse, C>, options: FetchOptions) -> Self {
        Self {
            client,
            cache,
            options,
        }
    }

    /// The cache this fetcher reads and populates.
    pub fn cache(&self) -> &SharedCache<CachedResponse, C> {
        &self.cache
    }

    // == Get ==
    /// Fetches `url`, serving a fresh cached copy when one exists.
    ///
    /// Successful (2xx) responses are cached. When the request fails at the
    /// transport level or the upstream answers 5xx, the fallback copy is
    /// returned with `stale = true` if one exists.
    pub async fn get(&self, url: &str) -> Result<CachedResponse> {
        let fresh_key = format!("{FRESH_PREFIX}{url}");

        if let Some(hit) = self.cache.write().await.get(&fresh_key) {
            debug!(url, "served from cache");
            return Ok(hit);
        }

        let outcome = match self.client.get(url).send().await {
            Ok(response) => CachedResponse::read(response).await,
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(response) if response.is_success() => {
                self.store(url, &response).await;
                Ok(response)
            }
            Ok(response) if response.is_server_error() => {
                warn!(url, status = response.status, "upstream error");
                Ok(self.stale(url).await.unwrap_or(response))
            }
            Ok(response) => Ok(response),
            Err(err) => {
                warn!(url, error = %err, "upstream request failed");
                self.stale(url).await.ok_or(err)
            }
        }
    }

    // == Send ==
    /// Issues a request with an optional JSON body.
    ///
    /// GET and HEAD go through [`CachedFetcher::get`]. Any other method always
    /// reaches the network and is never cached; a 2xx answer invalidates every
    /// cached entry whose key mentions `url`.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<CachedResponse> {
        if method == Method::GET || method == Method::HEAD {
            return self.get(url).await;
        }

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = CachedResponse::read(request.send().await?).await?;

        if response.is_success() {
            let removed = self.cache.write().await.invalidate(url);
            debug!(url, removed, "invalidated after mutation");
        }
        Ok(response)
    }

    /// Writes the fallback copy, then the fresh one, so the fresh copy is the
    /// most recently used of the pair.
    async fn store(&self, url: &str, response: &CachedResponse) {
        let mut cache = self.cache.write().await;
        cache.set(
            format!("{STALE_PREFIX}{url}"),
            response.clone(),
            Some(self.options.stale_ttl_ms),
        );
        cache.set(
            format!("{FRESH_PREFIX}{url}"),
            response.clone(),
            Some(self.options.ttl_ms),
        );
    }

    async fn stale(&self, url: &str) -> Option<CachedResponse> {
        let key = format!("{STALE_PREFIX}{url}");
        let mut cached = self.cache.write().await.get(&key)?;
        cached.stale = true;
        Some(cached)
    }
}
