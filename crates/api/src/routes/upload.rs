//! Route definitions for the `/upload` resource.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::middleware::rate_limit::upload_rate_limit;
use crate::state::AppState;

/// Routes mounted at `/upload`.
///
/// ```text
/// POST /  -> multipart upload (requires auth, 10/hr)
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    // Allow headroom over the file size limit for multipart framing.
    let body_limit = state.config.max_upload_bytes + 64 * 1024;
    Router::new()
        .route("/", post(upload::upload))
        .route_layer(middleware::from_fn_with_state(state, upload_rate_limit))
        .layer(DefaultBodyLimit::max(body_limit))
}
