//! Handlers for the `/auth` resource (register, login, logout, profile).

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use spectra_core::error::CoreError;
use spectra_db::models::user::{CreateUser, UpdateProfile, UserResponse, UserStats};
use spectra_db::repositories::{CollectionRepo, NftRepo, TransactionRepo, UserRepo};
use validator::Validate;

use crate::auth::cookie::{build_auth_cookie, build_clear_cookie};
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, RequestId};
use crate::state::AppState;

/// Starting balance credited to every new account.
const STARTING_BALANCE: f64 = 250.0;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 3, max = 24, message = "must be 3 to 24 characters"))]
    pub username: String,
    pub password: String,
    pub bio: Option<String>,
}

/// Request body for `POST /auth/login`. The identifier may be an email
/// address or a username.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Request body for `PUT /auth/profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 24, message = "must be 3 to 24 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
    #[serde(rename = "avatarSeed")]
    pub avatar_seed: Option<String>,
}

/// Request body for `PUT /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account, seed its balance, and sign the caller in by setting
/// the auth cookie.
pub async fn register(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Response> {
    input.validate()?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.to_lowercase(),
            username: input.username.clone(),
            password_hash,
            bio: input.bio,
            // Deterministic procedural avatar until the user picks one.
            avatar_seed: Some(input.username),
            balance: STARTING_BALANCE,
        },
    )
    .await?;

    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = build_auth_cookie(&state.config, &token);

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::new(UserResponse::from(user), request_id)),
    )
        .into_response())
}

/// POST /auth/login
///
/// Authenticate with email-or-username + password. Sets the auth cookie.
pub async fn login(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(input): Json<LoginRequest>,
) -> AppResult<Response> {
    let user = UserRepo::find_by_email_or_username(&state.pool, &input.identifier)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = build_auth_cookie(&state.config, &token);

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::new(UserResponse::from(user), request_id)),
    )
        .into_response())
}

/// POST /auth/logout
///
/// Clears the auth cookie. Idempotent; works for anonymous callers too.
pub async fn logout(State(state): State<AppState>, request_id: RequestId) -> Response {
    let cookie = build_clear_cookie(&state.config);
    (
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::with_message((), "Logged out", request_id)),
    )
        .into_response()
}

/// GET /auth/me
///
/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;
    Ok(Json(ApiResponse::new(UserResponse::from(user), request_id)))
}

/// GET /auth/stats
///
/// Aggregate marketplace activity for the authenticated user.
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<UserStats>>> {
    let owned_nfts = NftRepo::count_by_owner(&state.pool, user.user_id).await?;
    let created_nfts = NftRepo::count_by_creator(&state.pool, user.user_id).await?;
    let created_collections = CollectionRepo::count_by_creator(&state.pool, user.user_id).await?;
    let total_earned = TransactionRepo::total_earned(&state.pool, user.user_id).await?;
    let total_spent = TransactionRepo::total_spent(&state.pool, user.user_id).await?;

    Ok(Json(ApiResponse::new(
        UserStats {
            owned_nfts,
            created_nfts,
            created_collections,
            total_earned,
            total_spent,
        },
        request_id,
    )))
}

/// PUT /auth/profile
///
/// Update profile fields. Only fields present in the body are changed.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    input.validate()?;

    let patch = UpdateProfile {
        username: input.username,
        bio: input.bio,
        avatar_seed: input.avatar_seed,
    };
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let updated = UserRepo::update_profile(&state.pool, user.user_id, &patch)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    Ok(Json(ApiResponse::new(UserResponse::from(updated), request_id)))
}

/// PUT /auth/change-password
///
/// Verify the current password, then replace it.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let current_valid = verify_password(&input.current_password, &row.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.user_id, &new_hash).await?;

    tracing::info!(user_id = user.user_id, "Password changed");

    Ok(Json(ApiResponse::with_message((), "Password updated", request_id)))
}
