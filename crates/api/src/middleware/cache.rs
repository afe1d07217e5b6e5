//! In-memory response cache for hot read endpoints.
//!
//! Successful JSON responses are cached keyed by full path and query string.
//! Writes invalidate by regex over the keys, so one mutation can evict every
//! cached page of a listing at once.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{OriginalUri, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;

use crate::state::AppState;

/// TTL for market stats responses.
const MARKET_TTL: Duration = Duration::from_secs(60);
/// TTL for NFT listing responses.
const NFT_LIST_TTL: Duration = Duration::from_secs(120);
/// TTL for collection listing responses.
const COLLECTION_LIST_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    body: Bytes,
    expires_at: Instant,
}

/// Thread-safe response cache; designed to be wrapped in `Arc` and shared
/// across the application.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a fresh entry. Expired entries are treated as absent.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.body.clone())
    }

    /// Store a response body under the given key.
    pub async fn put(&self, key: String, body: Bytes, ttl: Duration) {
        let entry = CacheEntry {
            body,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Evict every entry whose key matches the regex pattern.
    ///
    /// An invalid pattern evicts nothing; patterns are compile-time constants
    /// in practice so this only trips in tests.
    pub async fn invalidate(&self, pattern: &str) {
        let Ok(re) = regex::Regex::new(pattern) else {
            tracing::warn!(pattern, "Invalid cache invalidation pattern");
            return;
        };
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !re.is_match(key));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(pattern, evicted, "Invalidated cache entries");
        }
    }

    /// Evict NFT listing and market pages after an NFT mutation.
    pub async fn invalidate_nfts(&self) {
        self.invalidate("^/(nfts|market)").await;
    }

    /// Evict collection pages (and NFT pages, which embed collection data)
    /// after a collection mutation.
    pub async fn invalidate_collections(&self) {
        self.invalidate("^/(collections|nfts)").await;
    }

    /// Drop entries past their TTL. Called by the background sweep task.
    pub async fn sweep_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Current number of cached entries (fresh or not).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache middleware for `GET /market/stats` (60 second TTL).
pub async fn market_stats_cache(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    serve_cached(state, req, next, MARKET_TTL, false).await
}

/// Cache middleware for `GET /nfts` (120 second TTL).
///
/// Free-text searches are skipped: the key space of `q` values is unbounded
/// and hit rates are near zero.
pub async fn nft_list_cache(State(state): State<AppState>, req: Request, next: Next) -> Response {
    serve_cached(state, req, next, NFT_LIST_TTL, true).await
}

/// Cache middleware for `GET /collections` (300 second TTL).
pub async fn collection_list_cache(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    serve_cached(state, req, next, COLLECTION_LIST_TTL, false).await
}

/// Serve from cache when possible, otherwise run the handler and store the
/// result. Only 200 responses are cached. Authenticated listings (owner or
/// creator scoped) bypass the cache entirely since their content is
/// per-user.
async fn serve_cached(
    state: AppState,
    req: Request,
    next: Next,
    ttl: Duration,
    skip_on_search: bool,
) -> Response {
    // Nested routers strip their mount prefix from `req.uri()`; the key must
    // come from the original URI so it carries the mount path.
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|orig| orig.0.clone())
        .unwrap_or_else(|| req.uri().clone());

    let query = uri.query().unwrap_or("");
    let skip = (skip_on_search && query_has_param(query, "q"))
        || query_has_param(query, "owner")
        || query_has_param(query, "creator");

    let key = uri
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_else(|| uri.path().to_string());

    if !skip {
        if let Some(body) = state.cache.get(&key).await {
            tracing::debug!(key, "Cache hit");
            return json_response(body);
        }
    }

    let response = next.run(req).await;
    if skip || response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    state.cache.put(key, bytes.clone(), ttl).await;
    Response::from_parts(parts, Body::from(bytes))
}

fn query_has_param(query: &str, name: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').map(|(k, v)| (k, v)).or(Some((pair, ""))))
        .any(|(k, v)| k == name && !v.is_empty())
}

fn json_response(body: Bytes) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-cache", "hit")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
