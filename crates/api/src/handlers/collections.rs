//! Handlers for the `/collections` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use spectra_core::error::CoreError;
use spectra_core::types::DbId;
use spectra_db::models::collection::{Collection, CollectionListParams, CreateCollection};
use spectra_db::models::Page;
use spectra_db::repositories::{CollectionRepo, NftRepo};
use spectra_db::{clamp_limit, clamp_page};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::CollectionListQuery;
use crate::response::{ApiResponse, RequestId};
use crate::state::AppState;

/// NFTs embedded in the collection detail view.
const DETAIL_NFT_LIMIT: i64 = 24;

/// Request body for `POST /collections`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCollectionRequest {
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub category: String,
    #[serde(rename = "coverSeed")]
    pub cover_seed: Option<String>,
}

/// GET /collections
///
/// Filtered, paginated listing ordered by traded volume.
pub async fn list(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<CollectionListQuery>,
) -> AppResult<Json<ApiResponse<Page<Collection>>>> {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit);
    let params = CollectionListParams {
        page,
        limit,
        q: query.q.filter(|s| !s.is_empty()),
        category: query.category,
        creator_id: None,
        verified: query.verified,
        featured: query.featured,
    };

    let (items, total) = CollectionRepo::list(&state.pool, &params).await?;
    Ok(Json(ApiResponse::new(
        Page::new(items, total, page, limit),
        request_id,
    )))
}

/// GET /collections/{id}
///
/// Detail view: the collection plus its most recent NFTs.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let collection = CollectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "collection",
            id,
        }))?;

    let nfts = NftRepo::list_by_collection(&state.pool, id, DETAIL_NFT_LIMIT).await?;

    let body = serde_json::json!({
        "collection": collection,
        "nfts": nfts,
    });

    Ok(Json(ApiResponse::new(body, request_id)))
}

/// POST /collections
///
/// Create a collection owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
    Json(input): Json<CreateCollectionRequest>,
) -> AppResult<Response> {
    input.validate()?;

    let cover_seed = input
        .cover_seed
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| input.name.to_lowercase());

    let collection = CollectionRepo::create(
        &state.pool,
        &CreateCollection {
            name: input.name,
            description: input.description,
            category: input.category.to_lowercase(),
            creator_id: user.user_id,
            cover_seed: Some(cover_seed),
        },
    )
    .await?;

    state.cache.invalidate_collections().await;
    tracing::info!(collection_id = collection.id, user_id = user.user_id, "Collection created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(collection, request_id)),
    )
        .into_response())
}
