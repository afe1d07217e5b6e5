//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use spectra_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar_seed: Option<String>,
    pub balance: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    pub avatar_seed: Option<String>,
    pub balance: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            bio: user.bio,
            avatar_seed: user.avatar_seed,
            balance: user.balance,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar_seed: Option<String>,
    /// Starting balance. Registration seeds new accounts with 250.
    pub balance: f64,
}

/// DTO for updating profile fields. All fields are optional; only non-`None`
/// values are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_seed: Option<String>,
}

impl UpdateProfile {
    /// True when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.bio.is_none() && self.avatar_seed.is_none()
    }
}

/// Aggregate marketplace activity for one user.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub owned_nfts: i64,
    pub created_nfts: i64,
    pub created_collections: i64,
    pub total_earned: f64,
    pub total_spent: f64,
}
