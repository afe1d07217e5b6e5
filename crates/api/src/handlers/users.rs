//! Handlers for the public `/users` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use spectra_core::error::CoreError;
use spectra_core::types::DbId;
use spectra_db::models::user::{UpdateProfile, UserResponse};
use spectra_db::repositories::{CollectionRepo, NftRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, RequestId};
use crate::state::AppState;

/// Request body for `PATCH /users/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct PatchMeRequest {
    #[validate(length(min = 3, max = 30, message = "must be 3 to 30 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub bio: Option<String>,
}

/// GET /users/{id}
///
/// Public profile with ownership counts. No auth required.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    let owned_nfts = NftRepo::count_by_owner(&state.pool, id).await?;
    let created_nfts = NftRepo::count_by_creator(&state.pool, id).await?;
    let created_collections = CollectionRepo::count_by_creator(&state.pool, id).await?;

    let body = serde_json::json!({
        "user": UserResponse::from(user),
        "ownedNfts": owned_nfts,
        "createdNfts": created_nfts,
        "createdCollections": created_collections,
    });

    Ok(Json(ApiResponse::new(body, request_id)))
}

/// PATCH /users/me
///
/// Update the caller's username or bio. An empty patch is rejected; a
/// duplicate username surfaces as a conflict.
pub async fn patch_me(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
    Json(input): Json<PatchMeRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    input.validate()?;

    let patch = UpdateProfile {
        username: input.username,
        bio: input.bio,
        avatar_seed: None,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No changes provided".into()));
    }

    let updated = UserRepo::update_profile(&state.pool, user.user_id, &patch)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    Ok(Json(ApiResponse::new(UserResponse::from(updated), request_id)))
}
