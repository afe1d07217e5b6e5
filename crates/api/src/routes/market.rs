//! Route definitions for the `/market` resource.

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::handlers::market;
use crate::middleware::cache::market_stats_cache;
use crate::state::AppState;

/// Routes mounted at `/market`.
///
/// ```text
/// GET /stats  -> marketplace stats (cached 60s)
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(market::stats))
        .route_layer(middleware::from_fn_with_state(state, market_stats_cache))
}
