//! Route definitions for the `/auth` resource.

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::middleware::rate_limit::auth_rate_limit;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST  /register         -> register (rate limited)
/// POST  /login            -> login (rate limited)
/// POST  /logout           -> logout
/// GET   /me               -> current user (requires auth)
/// GET   /stats            -> activity stats (requires auth)
/// PUT   /profile          -> update profile (requires auth)
/// PUT   /change-password  -> change password (requires auth)
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(state, auth_rate_limit));

    Router::new()
        .merge(limited)
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/stats", get(auth::stats))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", put(auth::change_password))
}
