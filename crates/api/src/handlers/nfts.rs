//! Handlers for the `/nfts` resource: listing, detail, mint, sale lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use spectra_core::attributes::{rarity_score, Attribute};
use spectra_core::error::CoreError;
use spectra_core::types::DbId;
use spectra_db::models::nft::{CreateNft, FileType, Nft, NftListParams, SaleOutcome};
use spectra_db::models::transaction::{CreateTransaction, Transaction, TxType};
use spectra_db::models::user::UserResponse;
use spectra_db::models::Page;
use spectra_db::repositories::{CollectionRepo, NftRepo, TransactionRepo, UserRepo};
use spectra_db::{clamp_limit, clamp_page};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalUser};
use crate::query::NftListQuery;
use crate::response::{ApiResponse, RequestId};
use crate::state::AppState;

/// Ledger entries returned on the NFT detail page.
const DETAIL_HISTORY_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /nfts` (mint).
#[derive(Debug, Deserialize, Validate)]
pub struct MintRequest {
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(rename = "imageSeed")]
    pub image_seed: Option<String>,
    /// Uploaded media URLs, typically from `POST /upload`.
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "videoUrl")]
    pub video_url: Option<String>,
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
    #[serde(rename = "fileType", default)]
    pub file_type: FileType,
    #[serde(rename = "collectionId")]
    pub collection_id: Option<DbId>,
    /// Asking price. Presence puts the NFT up for sale immediately.
    pub price: Option<f64>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Request body for `POST /nfts/{id}/list`.
#[derive(Debug, Deserialize)]
pub struct ListForSaleRequest {
    pub price: f64,
}

/// Query parameters for `GET /nfts/{id}/transactions`.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /nfts
///
/// Filtered, sorted, paginated listing. The `owner=true` and `creator=true`
/// flags scope results to the signed-in user and require authentication.
pub async fn list(
    State(state): State<AppState>,
    user: OptionalUser,
    request_id: RequestId,
    Query(query): Query<NftListQuery>,
) -> AppResult<Json<ApiResponse<Page<Nft>>>> {
    let scoped_user = if query.owner || query.creator {
        let auth = user.0.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication required for owner or creator listings".into(),
            ))
        })?;
        Some(auth.user_id)
    } else {
        None
    };

    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit);
    let params = NftListParams {
        page,
        limit,
        q: query.q.filter(|s| !s.is_empty()),
        category: query.category,
        rarity: query.rarity,
        min_price: query.min_price,
        max_price: query.max_price,
        on_sale: query.on_sale,
        sort: query.sort,
        owner_id: scoped_user.filter(|_| query.owner),
        creator_id: scoped_user.filter(|_| query.creator),
    };

    let (items, total) = NftRepo::list(&state.pool, &params).await?;
    Ok(Json(ApiResponse::new(
        Page::new(items, total, page, limit),
        request_id,
    )))
}

/// GET /nfts/{id}
///
/// Detail view: the NFT plus its creator, owner, collection, and recent
/// ledger history.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let nft = NftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;

    let creator = UserRepo::find_by_id(&state.pool, nft.creator_id)
        .await?
        .map(UserResponse::from);
    let owner = UserRepo::find_by_id(&state.pool, nft.owner_id)
        .await?
        .map(UserResponse::from);
    let collection = match nft.collection_id {
        Some(cid) => CollectionRepo::find_by_id(&state.pool, cid).await?,
        None => None,
    };
    let history = TransactionRepo::list_by_nft(&state.pool, id, DETAIL_HISTORY_LIMIT).await?;

    let body = serde_json::json!({
        "nft": nft,
        "creator": creator,
        "owner": owner,
        "collection": collection,
        "history": history,
    });

    Ok(Json(ApiResponse::new(body, request_id)))
}

/// POST /nfts
///
/// Mint a new NFT owned and created by the caller. A price in the body
/// lists it for sale immediately.
pub async fn mint(
    State(state): State<AppState>,
    user: AuthUser,
    request_id: RequestId,
    Json(input): Json<MintRequest>,
) -> AppResult<Response> {
    input.validate()?;

    if let Some(price) = input.price {
        if price <= 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Price must be greater than zero".into(),
            )));
        }
    }
    if let Some(cid) = input.collection_id {
        CollectionRepo::find_by_id(&state.pool, cid)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "collection",
                id: cid,
            }))?;
    }

    let image_seed = input
        .image_seed
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| input.name.clone());
    let score = rarity_score(&input.attributes);
    let token_id = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..8]
    );
    let contract_address = format!("0x{}", Uuid::new_v4().simple());

    let nft = NftRepo::create(
        &state.pool,
        &CreateNft {
            name: input.name,
            description: input.description,
            image_seed,
            image_url: input.image_url.filter(|s| !s.is_empty()),
            video_url: input.video_url.filter(|s| !s.is_empty()),
            audio_url: input.audio_url.filter(|s| !s.is_empty()),
            file_type: input.file_type,
            token_id,
            contract_address,
            creator_id: user.user_id,
            collection_id: input.collection_id,
            price: input.price.unwrap_or(0.0),
            on_sale: input.price.is_some(),
            attributes: input.attributes,
            rarity_score: score,
        },
    )
    .await?;

    if let Some(cid) = nft.collection_id {
        CollectionRepo::increment_item_count(&state.pool, cid).await?;
    }

    TransactionRepo::create(
        &state.pool,
        &CreateTransaction {
            tx_type: TxType::Mint,
            nft_id: nft.id,
            from_user_id: None,
            to_user_id: Some(user.user_id),
            price: None,
        },
    )
    .await?;

    state.cache.invalidate_nfts().await;
    tracing::info!(nft_id = nft.id, user_id = user.user_id, "NFT minted");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(nft, request_id)),
    )
        .into_response())
}

/// POST /nfts/{id}/list
///
/// Put an owned NFT up for sale.
pub async fn list_for_sale(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    request_id: RequestId,
    Json(input): Json<ListForSaleRequest>,
) -> AppResult<Json<ApiResponse<Nft>>> {
    if input.price <= 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must be greater than zero".into(),
        )));
    }

    let nft = require_owned(&state, id, user.user_id).await?;

    let updated = NftRepo::set_listing(&state.pool, nft.id, input.price)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;

    TransactionRepo::create(
        &state.pool,
        &CreateTransaction {
            tx_type: TxType::List,
            nft_id: id,
            from_user_id: Some(user.user_id),
            to_user_id: None,
            price: Some(input.price),
        },
    )
    .await?;

    state.cache.invalidate_nfts().await;
    Ok(Json(ApiResponse::new(updated, request_id)))
}

/// POST /nfts/{id}/unlist
///
/// Take an owned NFT off the market.
pub async fn unlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<Nft>>> {
    let nft = require_owned(&state, id, user.user_id).await?;
    if !nft.on_sale {
        return Err(AppError::BadRequest("NFT is not listed for sale".into()));
    }

    let updated = NftRepo::unlist(&state.pool, nft.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;

    TransactionRepo::create(
        &state.pool,
        &CreateTransaction {
            tx_type: TxType::Unlist,
            nft_id: id,
            from_user_id: Some(user.user_id),
            to_user_id: None,
            price: None,
        },
    )
    .await?;

    state.cache.invalidate_nfts().await;
    Ok(Json(ApiResponse::new(updated, request_id)))
}

/// POST /nfts/{id}/buy
///
/// Purchase a listed NFT. Ownership, balances, and the sale ledger entry
/// all change inside one database transaction, so a losing concurrent buyer
/// sees a clean rejection rather than a half-applied sale.
pub async fn buy(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    request_id: RequestId,
) -> AppResult<Json<ApiResponse<Nft>>> {
    let nft = NftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;
    if nft.owner_id == user.user_id {
        return Err(AppError::BadRequest("You already own this NFT".into()));
    }
    if !nft.on_sale {
        return Err(AppError::BadRequest("NFT is not listed for sale".into()));
    }

    match NftRepo::execute_sale(&state.pool, id, user.user_id).await? {
        SaleOutcome::Completed => {}
        SaleOutcome::InsufficientFunds => {
            return Err(AppError::BadRequest("Insufficient balance".into()));
        }
        SaleOutcome::NotOnSale => {
            return Err(AppError::BadRequest("NFT is not listed for sale".into()));
        }
    }

    let updated = NftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;

    state.cache.invalidate_nfts().await;
    tracing::info!(nft_id = id, buyer_id = user.user_id, "NFT sold");

    Ok(Json(ApiResponse::new(updated, request_id)))
}

/// GET /nfts/{id}/transactions
///
/// Ledger history for one NFT, newest first.
pub async fn transactions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request_id: RequestId,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<ApiResponse<Vec<Transaction>>>> {
    NftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;

    let limit = query.limit.unwrap_or(DETAIL_HISTORY_LIMIT).clamp(1, 100);
    let history = TransactionRepo::list_by_nft(&state.pool, id, limit).await?;
    Ok(Json(ApiResponse::new(history, request_id)))
}

/// Fetch an NFT and verify the caller owns it.
async fn require_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Nft> {
    let nft = NftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "nft", id }))?;
    if nft.owner_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this NFT".into(),
        )));
    }
    Ok(nft)
}
