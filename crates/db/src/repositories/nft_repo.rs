//! Repository for the `nfts` table, including the purchase transaction.

use spectra_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::nft::{CreateNft, Nft, NftListParams, SaleOutcome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image_seed, image_url, video_url, \
                        audio_url, file_type, token_id, contract_address, creator_id, \
                        owner_id, collection_id, price, on_sale, attributes, \
                        rarity_score, views, likes, created_at, updated_at";

/// Provides CRUD operations for NFTs.
pub struct NftRepo;

impl NftRepo {
    /// Mint (insert) a new NFT, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateNft) -> Result<Nft, sqlx::Error> {
        let query = format!(
            "INSERT INTO nfts (\
                name, description, image_seed, image_url, video_url, audio_url, \
                file_type, token_id, contract_address, creator_id, owner_id, \
                collection_id, price, on_sale, attributes, rarity_score\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nft>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(&input.image_seed)
            .bind(input.image_url.as_deref())
            .bind(input.video_url.as_deref())
            .bind(input.audio_url.as_deref())
            .bind(input.file_type)
            .bind(&input.token_id)
            .bind(&input.contract_address)
            .bind(input.creator_id)
            .bind(input.collection_id)
            .bind(input.price)
            .bind(input.on_sale)
            .bind(Json(&input.attributes))
            .bind(input.rarity_score)
            .fetch_one(pool)
            .await
    }

    /// Find an NFT by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Nft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nfts WHERE id = $1");
        sqlx::query_as::<_, Nft>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List NFTs with optional filters, sorting, and pagination.
    ///
    /// Returns the page of rows plus the total match count.
    pub async fn list(
        pool: &PgPool,
        params: &NftListParams,
    ) -> Result<(Vec<Nft>, i64), sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.q.is_some() {
            conditions.push(format!(
                "(name ILIKE ${bind_idx} OR description ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.category.is_some() {
            // Category lives on the collection, not the NFT itself.
            conditions.push(format!(
                "collection_id IN (SELECT id FROM collections WHERE category = ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.rarity.is_some() {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM jsonb_array_elements(attributes) attr \
                 WHERE attr->>'rarity' = ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.min_price.is_some() {
            conditions.push(format!("price >= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.max_price.is_some() {
            conditions.push(format!("price <= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.on_sale.is_some() {
            conditions.push(format!("on_sale = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.owner_id.is_some() {
            conditions.push(format!("owner_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.creator_id.is_some() {
            conditions.push(format!("creator_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM nfts {where_clause}");
        let mut cq = sqlx::query_as::<_, (i64,)>(&count_query);
        cq = Self::bind_filters(cq, params);
        let (total,) = cq.fetch_one(pool).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM nfts {where_clause} \
             ORDER BY {order} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            order = params.sort.order_clause(),
            next_idx = bind_idx + 1,
        );
        let mut q = sqlx::query_as::<_, Nft>(&query);
        q = Self::bind_filters(q, params);
        let offset = (params.page - 1) * params.limit;
        let items = q.bind(params.limit).bind(offset).fetch_all(pool).await?;

        Ok((items, total))
    }

    /// NFTs belonging to one collection, newest first, capped at `limit`.
    pub async fn list_by_collection(
        pool: &PgPool,
        collection_id: DbId,
        limit: i64,
    ) -> Result<Vec<Nft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nfts WHERE collection_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, Nft>(&query)
            .bind(collection_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Put an NFT up for sale at the given price.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_listing(
        pool: &PgPool,
        id: DbId,
        price: f64,
    ) -> Result<Option<Nft>, sqlx::Error> {
        let query = format!(
            "UPDATE nfts SET price = $2, on_sale = true, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nft>(&query)
            .bind(id)
            .bind(price)
            .fetch_optional(pool)
            .await
    }

    /// Remove an NFT from sale.
    pub async fn unlist(pool: &PgPool, id: DbId) -> Result<Option<Nft>, sqlx::Error> {
        let query = format!(
            "UPDATE nfts SET on_sale = false, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nft>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Execute a purchase as a single database transaction.
    ///
    /// Locks the NFT row, verifies it is still listed, conditionally debits
    /// the buyer (the balance check happens in the UPDATE itself), credits
    /// the seller, flips ownership, records the sale in the ledger, and bumps
    /// the collection's traded volume. Any early return rolls back the whole
    /// transaction.
    pub async fn execute_sale(
        pool: &PgPool,
        nft_id: DbId,
        buyer_id: DbId,
    ) -> Result<SaleOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId, f64, bool, Option<DbId>)> = sqlx::query_as(
            "SELECT owner_id, price, on_sale, collection_id FROM nfts \
             WHERE id = $1 FOR UPDATE",
        )
        .bind(nft_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((seller_id, price, on_sale, collection_id)) = row else {
            tx.rollback().await?;
            return Ok(SaleOutcome::NotOnSale);
        };
        if !on_sale || seller_id == buyer_id {
            tx.rollback().await?;
            return Ok(SaleOutcome::NotOnSale);
        }

        let debit = sqlx::query(
            "UPDATE users SET balance = balance - $2, updated_at = NOW() \
             WHERE id = $1 AND balance >= $2",
        )
        .bind(buyer_id)
        .bind(price)
        .execute(&mut *tx)
        .await?;
        if debit.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(SaleOutcome::InsufficientFunds);
        }

        sqlx::query("UPDATE users SET balance = balance + $2, updated_at = NOW() WHERE id = $1")
            .bind(seller_id)
            .bind(price)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE nfts SET owner_id = $2, on_sale = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(nft_id)
        .bind(buyer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO transactions (tx_type, nft_id, from_user_id, to_user_id, price) \
             VALUES ('sale', $1, $2, $3, $4)",
        )
        .bind(nft_id)
        .bind(seller_id)
        .bind(buyer_id)
        .bind(price)
        .execute(&mut *tx)
        .await?;

        if let Some(cid) = collection_id {
            sqlx::query(
                "UPDATE collections SET volume_traded = volume_traded + $2, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(cid)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(SaleOutcome::Completed)
    }

    /// Count NFTs currently owned by one user.
    pub async fn count_by_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM nfts WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Count NFTs minted by one user.
    pub async fn count_by_creator(pool: &PgPool, creator_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM nfts WHERE creator_id = $1")
            .bind(creator_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Newest NFTs currently listed for sale.
    pub async fn newest_on_sale(pool: &PgPool, limit: i64) -> Result<Vec<Nft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nfts WHERE on_sale = true \
             ORDER BY created_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, Nft>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Newest NFTs regardless of listing state.
    pub async fn newest(pool: &PgPool, limit: i64) -> Result<Vec<Nft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nfts ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Nft>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Bind the dynamic filter parameters in the same order they were pushed.
    fn bind_filters<'q, O>(
        mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
        params: &'q NftListParams,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        if let Some(ref search) = params.q {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(ref category) = params.category {
            q = q.bind(category);
        }
        if let Some(ref rarity) = params.rarity {
            q = q.bind(rarity);
        }
        if let Some(min_price) = params.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = params.max_price {
            q = q.bind(max_price);
        }
        if let Some(on_sale) = params.on_sale {
            q = q.bind(on_sale);
        }
        if let Some(owner_id) = params.owner_id {
            q = q.bind(owner_id);
        }
        if let Some(creator_id) = params.creator_id {
            q = q.bind(creator_id);
        }
        q
    }
}
