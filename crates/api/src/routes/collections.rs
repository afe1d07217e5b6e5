//! Route definitions for the `/collections` resource.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::collections;
use crate::middleware::cache::collection_list_cache;
use crate::state::AppState;

/// Routes mounted at `/collections`.
///
/// ```text
/// GET  /      -> list (cached 300s)
/// POST /      -> create (requires auth)
/// GET  /{id}  -> detail with recent NFTs
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    let listing = Router::new().route("/", get(collections::list)).route_layer(
        middleware::from_fn_with_state(state, collection_list_cache),
    );

    Router::new()
        .merge(listing)
        .route("/", post(collections::create))
        .route("/{id}", get(collections::get_by_id))
}
