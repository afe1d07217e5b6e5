//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;
use spectra_db::models::nft::NftSort;

/// Query parameters for `GET /nfts`.
///
/// Page and limit are clamped in the db layer via `clamp_page` / `clamp_limit`.
/// The `owner` and `creator` flags scope the listing to the authenticated
/// user and require a valid auth cookie.
#[derive(Debug, Default, Deserialize)]
pub struct NftListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub rarity: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
    #[serde(rename = "onSale")]
    pub on_sale: Option<bool>,
    #[serde(default)]
    pub sort: NftSort,
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub creator: bool,
}

/// Query parameters for `GET /collections`.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub q: Option<String>,
    pub category: Option<String>,
    pub verified: Option<bool>,
    pub featured: Option<bool>,
}

/// Query parameters for the SVG image endpoint (`?size=`).
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub size: Option<u32>,
}
