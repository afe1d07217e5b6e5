//! Route definitions for the `/nfts` resource.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::nfts;
use crate::middleware::cache::nft_list_cache;
use crate::middleware::rate_limit::buy_rate_limit;
use crate::state::AppState;

/// Routes mounted at `/nfts`.
///
/// ```text
/// GET  /                   -> list (cached 120s, except searches)
/// POST /                   -> mint (requires auth)
/// GET  /{id}               -> detail
/// POST /{id}/list          -> list for sale (requires auth)
/// POST /{id}/unlist        -> take off sale (requires auth)
/// POST /{id}/buy           -> purchase (requires auth, 3/min)
/// GET  /{id}/transactions  -> ledger history
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    let listing = Router::new().route("/", get(nfts::list)).route_layer(
        middleware::from_fn_with_state(state.clone(), nft_list_cache),
    );

    let buying = Router::new()
        .route("/{id}/buy", post(nfts::buy))
        .route_layer(middleware::from_fn_with_state(state, buy_rate_limit));

    Router::new()
        .merge(listing)
        .merge(buying)
        .route("/", post(nfts::mint))
        .route("/{id}", get(nfts::get_by_id))
        .route("/{id}/list", post(nfts::list_for_sale))
        .route("/{id}/unlist", post(nfts::unlist))
        .route("/{id}/transactions", get(nfts::transactions))
}
