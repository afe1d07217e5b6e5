//! Sliding-window rate limiting.
//!
//! Each limiter key holds the timestamps of its recent hits; a request is
//! allowed when fewer than `max` hits fall inside the window. The auth
//! limiter keys on client IP, route, and the submitted identifier so one
//! attacker cannot lock out a victim's account from a different address,
//! and refunds the slot on success so legitimate logins are never throttled.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::state::AppState;

/// Auth endpoints: 20 attempts per 5 minutes, refunded on success.
const AUTH_WINDOW: Duration = Duration::from_secs(5 * 60);
const AUTH_MAX: usize = 20;

/// General API traffic: 100 requests per 15 minutes.
const API_WINDOW: Duration = Duration::from_secs(15 * 60);
const API_MAX: usize = 100;

/// File uploads: 10 per hour.
const UPLOAD_WINDOW: Duration = Duration::from_secs(60 * 60);
const UPLOAD_MAX: usize = 10;

/// Purchases: 3 per minute.
const BUY_WINDOW: Duration = Duration::from_secs(60);
const BUY_MAX: usize = 3;

/// Longest window any limiter uses; hits older than this are garbage.
const MAX_WINDOW: Duration = UPLOAD_WINDOW;

/// Thread-safe sliding-window limiter; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct RateLimiter {
    hits: RwLock<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a new, empty limiter.
    pub fn new() -> Self {
        Self {
            hits: RwLock::new(HashMap::new()),
        }
    }

    /// Record a hit for `key` and report whether it is within budget.
    ///
    /// Returns `false` when the key already has `max` hits inside `window`;
    /// the rejected hit is not recorded.
    pub async fn check(&self, key: &str, window: Duration, max: usize) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write().await;
        let entry = hits.entry(key.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < window);
        if entry.len() >= max {
            return false;
        }
        entry.push(now);
        true
    }

    /// Remove the most recent hit for `key`.
    ///
    /// Used by the auth limiter so successful logins do not consume budget.
    pub async fn refund(&self, key: &str) {
        let mut hits = self.hits.write().await;
        if let Some(entry) = hits.get_mut(key) {
            entry.pop();
            if entry.is_empty() {
                hits.remove(key);
            }
        }
    }

    /// Drop hits older than the longest window and empty keys. Called by the
    /// background sweep task.
    pub async fn sweep_expired(&self) {
        let now = Instant::now();
        let mut hits = self.hits.write().await;
        hits.retain(|_, entry| {
            entry.retain(|t| now.duration_since(*t) < MAX_WINDOW);
            !entry.is_empty()
        });
    }

    /// Current number of tracked keys.
    pub async fn key_count(&self) -> usize {
        self.hits.read().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// General API rate limit, keyed by client IP.
pub async fn api_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = format!("{}|api", client_ip(req.headers()));
    if !state.limiter.check(&key, API_WINDOW, API_MAX).await {
        return AppError::RateLimited.into_response();
    }
    next.run(req).await
}

/// Purchase rate limit, keyed by client IP.
pub async fn buy_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = format!("{}|buy", client_ip(req.headers()));
    if !state.limiter.check(&key, BUY_WINDOW, BUY_MAX).await {
        return AppError::RateLimited.into_response();
    }
    next.run(req).await
}

/// Upload rate limit, keyed by client IP.
pub async fn upload_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = format!("{}|upload", client_ip(req.headers()));
    if !state.limiter.check(&key, UPLOAD_WINDOW, UPLOAD_MAX).await {
        return AppError::RateLimited.into_response();
    }
    next.run(req).await
}

/// Auth rate limit, keyed by IP, route, and submitted identifier.
///
/// Buffers the JSON body to read the email or username, then reconstructs
/// the request for the handler. Successful attempts (2xx) are refunded so
/// only failures burn budget.
pub async fn auth_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let ip = client_ip(req.headers());
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(_) => return AppError::BadRequest("Request body too large".into()).into_response(),
    };
    let identifier = identifier_from_body(&bytes);
    let req = Request::from_parts(parts, Body::from(bytes));

    let key = format!("{ip}|{method}:{path}|{identifier}");
    if !state.limiter.check(&key, AUTH_WINDOW, AUTH_MAX).await {
        tracing::warn!(%ip, %path, "Auth rate limit exceeded");
        return AppError::RateLimited.into_response();
    }

    let response = next.run(req).await;
    if response.status().is_success() {
        state.limiter.refund(&key).await;
    }
    response
}

/// Best-effort client IP: first entry of `x-forwarded-for`, else `local`.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "local".to_string())
}

/// Pull the email or username out of a JSON auth body, if present.
fn identifier_from_body(bytes: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|v| {
            v.get("email")
                .or_else(|| v.get("username"))
                .or_else(|| v.get("identifier"))
                .and_then(|id| id.as_str())
                .map(|s| s.to_lowercase())
        })
        .unwrap_or_else(|| "anonymous".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_max_then_blocks() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("k", Duration::from_secs(60), 3).await);
        }
        assert!(!limiter.check("k", Duration::from_secs(60), 3).await);

        // A different key has its own budget.
        assert!(limiter.check("other", Duration::from_secs(60), 3).await);
    }

    #[tokio::test]
    async fn test_refund_restores_budget() {
        let limiter = RateLimiter::new();
        for _ in 0..3 {
            assert!(limiter.check("k", Duration::from_secs(60), 3).await);
        }
        limiter.refund("k").await;
        assert!(limiter.check("k", Duration::from_secs(60), 3).await);
        assert!(!limiter.check("k", Duration::from_secs(60), 3).await);
    }

    #[tokio::test]
    async fn test_window_expiry_frees_slots() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("k", Duration::ZERO, 1).await);
        // The previous hit is already outside the zero-length window.
        assert!(limiter.check("k", Duration::ZERO, 1).await);
    }

    #[tokio::test]
    async fn test_sweep_drops_empty_keys() {
        let limiter = RateLimiter::new();
        limiter.check("k", Duration::from_secs(60), 5).await;
        assert_eq!(limiter.key_count().await, 1);

        // Hits within MAX_WINDOW survive the sweep.
        limiter.sweep_expired().await;
        assert_eq!(limiter.key_count().await, 1);
    }

    #[test]
    fn test_identifier_from_body() {
        assert_eq!(
            identifier_from_body(br#"{"email":"A@b.com","password":"x"}"#),
            "a@b.com"
        );
        assert_eq!(
            identifier_from_body(br#"{"identifier":"bob","password":"x"}"#),
            "bob"
        );
        assert_eq!(identifier_from_body(b"not json"), "anonymous");
    }
}
