//! NFT entity model, list filters, and sale outcome types.

use serde::{Deserialize, Serialize};
use spectra_core::attributes::Attribute;
use spectra_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// Media type of the underlying asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
    Gif,
    #[sqlx(rename = "3d")]
    #[serde(rename = "3d")]
    ThreeD,
}

impl Default for FileType {
    fn default() -> Self {
        Self::Image
    }
}

/// Full NFT row from the `nfts` table.
///
/// `attributes` is stored as a JSONB array; `Json` handles the mapping both
/// ways so callers work with typed [`Attribute`] values.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Nft {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_seed: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub file_type: FileType,
    pub token_id: String,
    pub contract_address: String,
    pub creator_id: DbId,
    pub owner_id: DbId,
    pub collection_id: Option<DbId>,
    pub price: f64,
    pub on_sale: bool,
    pub attributes: Json<Vec<Attribute>>,
    pub rarity_score: f64,
    pub views: i64,
    pub likes: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for minting a new NFT.
#[derive(Debug)]
pub struct CreateNft {
    pub name: String,
    pub description: Option<String>,
    pub image_seed: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub file_type: FileType,
    pub token_id: String,
    pub contract_address: String,
    pub creator_id: DbId,
    pub collection_id: Option<DbId>,
    pub price: f64,
    pub on_sale: bool,
    pub attributes: Vec<Attribute>,
    pub rarity_score: f64,
}

/// Sort orders for NFT listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NftSort {
    #[default]
    New,
    PriceAsc,
    PriceDesc,
}

impl NftSort {
    /// SQL ORDER BY clause for this sort order.
    pub fn order_clause(self) -> &'static str {
        match self {
            Self::New => "created_at DESC",
            Self::PriceAsc => "price ASC",
            Self::PriceDesc => "price DESC",
        }
    }
}

/// Filter parameters for listing NFTs.
#[derive(Debug, Default)]
pub struct NftListParams {
    pub page: i64,
    pub limit: i64,
    pub q: Option<String>,
    pub category: Option<String>,
    pub rarity: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub on_sale: Option<bool>,
    pub sort: NftSort,
    pub owner_id: Option<DbId>,
    pub creator_id: Option<DbId>,
}

/// Result of attempting a purchase inside one database transaction.
#[derive(Debug, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Ownership, balances, and the ledger were all updated.
    Completed,
    /// Buyer balance was below the asking price; nothing changed.
    InsufficientFunds,
    /// The NFT was no longer listed when the sale ran; nothing changed.
    NotOnSale,
}
