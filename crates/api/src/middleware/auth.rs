//! Cookie-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spectra_core::error::CoreError;
use spectra_core::types::DbId;

use crate::auth::cookie::extract_cookie;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the JWT auth cookie.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = user_id_from_parts(parts, state).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })?;
        Ok(AuthUser { user_id })
    }
}

/// Optional variant of [`AuthUser`].
///
/// Never rejects: yields `None` for anonymous or invalid-token requests.
/// Used by endpoints whose behavior changes when a user is signed in, such
/// as owner-scoped NFT listings.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(
            user_id_from_parts(parts, state).map(|user_id| AuthUser { user_id }),
        ))
    }
}

/// Pull the auth cookie from the request and validate the JWT inside it.
fn user_id_from_parts(parts: &Parts, state: &AppState) -> Option<DbId> {
    let header = parts.headers.get("cookie")?.to_str().ok()?;
    let token = extract_cookie(header, &state.config.cookie_name)?;
    let claims = validate_token(token, &state.config.jwt).ok()?;
    Some(claims.sub)
}
