//! Collection entity model and DTOs.

use serde::{Deserialize, Serialize};
use spectra_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full collection row from the `collections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collection {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub creator_id: DbId,
    pub cover_seed: Option<String>,
    pub verified: bool,
    pub featured: bool,
    pub floor_price: f64,
    pub volume_traded: f64,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new collection.
#[derive(Debug, Deserialize)]
pub struct CreateCollection {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub creator_id: DbId,
    pub cover_seed: Option<String>,
}

/// Filter parameters for listing collections.
#[derive(Debug, Default)]
pub struct CollectionListParams {
    pub page: i64,
    pub limit: i64,
    pub q: Option<String>,
    pub category: Option<String>,
    pub creator_id: Option<DbId>,
    pub verified: Option<bool>,
    pub featured: Option<bool>,
}
