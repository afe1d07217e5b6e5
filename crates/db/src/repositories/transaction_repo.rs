//! Repository for the append-only `transactions` ledger.

use spectra_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::transaction::{CollectionVolume, CreateTransaction, Transaction};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tx_type, nft_id, from_user_id, to_user_id, price, created_at";

/// Provides read and append operations for the ledger.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Append a ledger entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions (tx_type, nft_id, from_user_id, to_user_id, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.tx_type)
            .bind(input.nft_id)
            .bind(input.from_user_id)
            .bind(input.to_user_id)
            .bind(input.price)
            .fetch_one(pool)
            .await
    }

    /// Ledger entries for one NFT, newest first, capped at `limit`.
    pub async fn list_by_nft(
        pool: &PgPool,
        nft_id: DbId,
        limit: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions \
             WHERE nft_id = $1 ORDER BY created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(nft_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count sales recorded since the given instant.
    pub async fn count_sales_since(pool: &PgPool, since: Timestamp) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM transactions \
             WHERE tx_type = 'sale' AND created_at >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    /// Total sale count and summed volume since the given instant.
    pub async fn sales_totals_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<(i64, f64), sqlx::Error> {
        let row: (i64, f64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(price), 0.0) FROM transactions \
             WHERE tx_type = 'sale' AND created_at >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Top collections by sale volume since the given instant.
    pub async fn top_collections_since(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<CollectionVolume>, sqlx::Error> {
        sqlx::query_as::<_, CollectionVolume>(
            "SELECT n.collection_id, \
                    COUNT(t.id) AS sales, \
                    COALESCE(SUM(t.price), 0.0) AS volume \
             FROM transactions t \
             JOIN nfts n ON n.id = t.nft_id \
             WHERE t.tx_type = 'sale' AND t.created_at >= $1 \
               AND n.collection_id IS NOT NULL \
             GROUP BY n.collection_id \
             ORDER BY volume DESC \
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Total a user has earned selling NFTs.
    pub async fn total_earned(pool: &PgPool, user_id: DbId) -> Result<f64, sqlx::Error> {
        let row: (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(price), 0.0) FROM transactions \
             WHERE tx_type = 'sale' AND from_user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Total a user has spent buying NFTs.
    pub async fn total_spent(pool: &PgPool, user_id: DbId) -> Result<f64, sqlx::Error> {
        let row: (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(price), 0.0) FROM transactions \
             WHERE tx_type = 'sale' AND to_user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
