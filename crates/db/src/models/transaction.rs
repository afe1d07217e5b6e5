//! Transaction ledger entity model.

use serde::{Deserialize, Serialize};
use spectra_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Kind of marketplace event recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Mint,
    Sale,
    Transfer,
    List,
    Unlist,
}

/// One row of the append-only `transactions` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub tx_type: TxType,
    pub nft_id: DbId,
    pub from_user_id: Option<DbId>,
    pub to_user_id: Option<DbId>,
    pub price: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for appending a ledger entry.
#[derive(Debug)]
pub struct CreateTransaction {
    pub tx_type: TxType,
    pub nft_id: DbId,
    pub from_user_id: Option<DbId>,
    pub to_user_id: Option<DbId>,
    pub price: Option<f64>,
}

/// Sales volume rollup for one collection over a window.
#[derive(Debug, FromRow)]
pub struct CollectionVolume {
    pub collection_id: DbId,
    pub sales: i64,
    pub volume: f64,
}
