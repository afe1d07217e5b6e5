//! Route definitions for the public `/users` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET   /{id}  -> public profile
/// PATCH /me    -> update own username/bio (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", patch(users::patch_me))
        .route("/{id}", get(users::get_by_id))
}
