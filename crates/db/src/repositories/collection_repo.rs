//! Repository for the `collections` table.

use spectra_core::types::DbId;
use sqlx::PgPool;

use crate::models::collection::{Collection, CollectionListParams, CreateCollection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, category, creator_id, cover_seed, \
                        verified, featured, floor_price, volume_traded, item_count, \
                        created_at, updated_at";

/// Provides CRUD operations for collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollection,
    ) -> Result<Collection, sqlx::Error> {
        let query = format!(
            "INSERT INTO collections (name, description, category, creator_id, cover_seed)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collection>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(&input.category)
            .bind(input.creator_id)
            .bind(input.cover_seed.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find a collection by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = $1");
        sqlx::query_as::<_, Collection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a batch of collections by ID. Missing IDs are silently skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Collection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collections WHERE id = ANY($1)");
        sqlx::query_as::<_, Collection>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List collections with optional filters and pagination.
    ///
    /// Returns the page of rows plus the total match count so the caller can
    /// compute the page count.
    pub async fn list(
        pool: &PgPool,
        params: &CollectionListParams,
    ) -> Result<(Vec<Collection>, i64), sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.q.is_some() {
            conditions.push(format!("(name ILIKE ${bind_idx} OR description ILIKE ${bind_idx})"));
            bind_idx += 1;
        }
        if params.category.is_some() {
            conditions.push(format!("category = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.creator_id.is_some() {
            conditions.push(format!("creator_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.verified.is_some() {
            conditions.push(format!("verified = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.featured.is_some() {
            conditions.push(format!("featured = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM collections {where_clause}");
        let mut cq = sqlx::query_as::<_, (i64,)>(&count_query);
        cq = Self::bind_filters(cq, params);
        let (total,) = cq.fetch_one(pool).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM collections {where_clause} \
             ORDER BY volume_traded DESC, created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );
        let mut q = sqlx::query_as::<_, Collection>(&query);
        q = Self::bind_filters(q, params);
        let offset = (params.page - 1) * params.limit;
        let items = q.bind(params.limit).bind(offset).fetch_all(pool).await?;

        Ok((items, total))
    }

    /// Count collections created by one user.
    pub async fn count_by_creator(pool: &PgPool, creator_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM collections WHERE creator_id = $1")
                .bind(creator_id)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    /// Adjust denormalized item count after a mint into this collection.
    pub async fn increment_item_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE collections SET item_count = item_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Bind the dynamic filter parameters in the same order they were pushed.
    fn bind_filters<'q, O>(
        mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
        params: &'q CollectionListParams,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        if let Some(ref search) = params.q {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(ref category) = params.category {
            q = q.bind(category);
        }
        if let Some(creator_id) = params.creator_id {
            q = q.bind(creator_id);
        }
        if let Some(verified) = params.verified {
            q = q.bind(verified);
        }
        if let Some(featured) = params.featured {
            q = q.bind(featured);
        }
        q
    }
}
