use std::sync::Arc;

use spectra_db::DbPool;

use crate::config::ServerConfig;
use crate::middleware::cache::ResponseCache;
use crate::middleware::rate_limit::RateLimiter;
use crate::ws::WsManager;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// In-memory response cache for hot read endpoints.
    pub cache: Arc<ResponseCache>,
    /// Sliding-window rate limiter.
    pub limiter: Arc<RateLimiter>,
}
