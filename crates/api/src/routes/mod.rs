pub mod auth;
pub mod collections;
pub mod health;
pub mod images;
pub mod market;
pub mod nfts;
pub mod upload;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the API route tree.
///
/// Route builders take the shared state so per-route middleware (rate
/// limiting, response caching) can be attached with
/// `middleware::from_fn_with_state`.
///
/// Route hierarchy:
///
/// ```text
/// /ws                          market ticker WebSocket
///
/// /auth/register               register (public, auth rate limit)
/// /auth/login                  login (public, auth rate limit)
/// /auth/logout                 logout
/// /auth/me                     current user (requires auth)
/// /auth/stats                  activity stats (requires auth)
/// /auth/profile                update profile (PUT, requires auth)
/// /auth/change-password        change password (PUT, requires auth)
///
/// /users/{id}                  public profile
/// /users/me                    update own username/bio (PATCH, requires auth)
///
/// /nfts                        list (cached), mint (POST, requires auth)
/// /nfts/{id}                   detail
/// /nfts/{id}/list              list for sale (POST, requires auth)
/// /nfts/{id}/unlist            take off sale (POST, requires auth)
/// /nfts/{id}/buy               purchase (POST, requires auth, buy rate limit)
/// /nfts/{id}/transactions      ledger history
///
/// /collections                 list (cached), create (POST, requires auth)
/// /collections/{id}            detail with recent NFTs
///
/// /market/stats                marketplace stats (cached)
///
/// /image/{seed}                procedural SVG artwork
///
/// /upload                      multipart upload (POST, requires auth, upload rate limit)
/// ```
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // WebSocket ticker endpoint.
        .route("/ws", get(ws::ws_handler))
        // Registration and sign-in.
        .nest("/auth", auth::router(state.clone()))
        // Public user profiles.
        .nest("/users", users::router())
        // NFT listing, minting, and sale lifecycle.
        .nest("/nfts", nfts::router(state.clone()))
        // Collections.
        .nest("/collections", collections::router(state.clone()))
        // Marketplace stats.
        .nest("/market", market::router(state.clone()))
        // Procedural artwork.
        .nest("/image", images::router())
        // File uploads.
        .nest("/upload", upload::router(state))
}
