//! Route definitions for the `/image` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/image`.
///
/// ```text
/// GET /{seed}  -> procedural SVG artwork
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{seed}", get(images::generate))
}
