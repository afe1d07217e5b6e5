//! Handlers for the `/market` resource (aggregate marketplace stats).

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use spectra_core::types::{DbId, Timestamp};
use spectra_db::models::collection::Collection;
use spectra_db::models::nft::Nft;
use spectra_db::repositories::{CollectionRepo, NftRepo, TransactionRepo};

use crate::error::AppResult;
use crate::response::{ApiResponse, RequestId};
use crate::state::AppState;

/// Collections shown in the 24 hour volume leaderboard.
const TOP_COLLECTION_LIMIT: i64 = 5;
/// Newest listed NFTs shown in the trending rail.
const TRENDING_LIMIT: i64 = 8;
/// Newest NFTs shown in the featured rail.
const FEATURED_LIMIT: i64 = 6;

/// Rolling 24 hour sale totals.
#[derive(Debug, Serialize)]
pub struct MarketTotals {
    #[serde(rename = "sales24h")]
    pub sales_24h: i64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
}

/// One leaderboard entry with the full collection record embedded.
#[derive(Debug, Serialize)]
pub struct TopCollection {
    #[serde(rename = "collectionId")]
    pub collection_id: DbId,
    pub collection: Option<Collection>,
    pub volume: f64,
    pub sales: i64,
}

/// Marketplace-wide statistics.
#[derive(Debug, Serialize)]
pub struct MarketStats {
    pub timestamp: Timestamp,
    pub totals: MarketTotals,
    #[serde(rename = "topCollections")]
    pub top_collections: Vec<TopCollection>,
    #[serde(rename = "trendingNfts")]
    pub trending_nfts: Vec<Nft>,
    pub featured: Vec<Nft>,
}

/// GET /market/stats
///
/// 24 hour sales totals, the collection leaderboard, and the trending and
/// featured NFT rails. Served through the 60 second response cache.
pub async fn stats(
    State(state): State<AppState>,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<MarketStats>>> {
    let now = chrono::Utc::now();
    let day_ago = now - chrono::Duration::hours(24);

    let (sales_24h, volume_24h) = TransactionRepo::sales_totals_since(&state.pool, day_ago).await?;
    let rollups =
        TransactionRepo::top_collections_since(&state.pool, day_ago, TOP_COLLECTION_LIMIT).await?;

    let ids: Vec<DbId> = rollups.iter().map(|r| r.collection_id).collect();
    let collections = CollectionRepo::find_by_ids(&state.pool, &ids).await?;
    let top_collections = rollups
        .into_iter()
        .map(|r| TopCollection {
            collection: collections.iter().find(|c| c.id == r.collection_id).cloned(),
            collection_id: r.collection_id,
            volume: r.volume,
            sales: r.sales,
        })
        .collect();

    let trending_nfts = NftRepo::newest_on_sale(&state.pool, TRENDING_LIMIT).await?;
    let featured = NftRepo::newest(&state.pool, FEATURED_LIMIT).await?;

    Ok(Json(ApiResponse::new(
        MarketStats {
            timestamp: now,
            totals: MarketTotals {
                sales_24h,
                volume_24h,
            },
            top_collections,
            trending_nfts,
            featured,
        },
        request_id,
    )))
}
