//! Integration tests for the repository layer against a real Postgres.

use spectra_core::attributes::Attribute;
use spectra_db::models::collection::{CollectionListParams, CreateCollection};
use spectra_db::models::nft::{CreateNft, FileType, NftListParams, NftSort, SaleOutcome};
use spectra_db::models::transaction::{CreateTransaction, TxType};
use spectra_db::models::user::{CreateUser, UpdateProfile};
use spectra_db::repositories::{CollectionRepo, NftRepo, TransactionRepo, UserRepo};
use sqlx::PgPool;

fn sample_user(tag: &str) -> CreateUser {
    CreateUser {
        email: format!("{tag}@example.com"),
        username: tag.to_string(),
        password_hash: "$argon2id$fake".to_string(),
        bio: None,
        avatar_seed: Some(tag.to_string()),
        balance: 250.0,
    }
}

fn sample_nft(name: &str, creator_id: i64, price: f64, on_sale: bool) -> CreateNft {
    CreateNft {
        name: name.to_string(),
        description: Some(format!("{name} description")),
        image_seed: name.to_lowercase(),
        image_url: None,
        video_url: None,
        audio_url: None,
        file_type: FileType::Image,
        token_id: format!("tok-{name}"),
        contract_address: format!("0x{name}"),
        creator_id,
        collection_id: None,
        price,
        on_sale,
        attributes: vec![Attribute {
            trait_type: "Background".to_string(),
            value: "Aurora".to_string(),
            rarity: Some("Rare".to_string()),
        }],
        rarity_score: 30.0,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_create_and_lookup(pool: PgPool) {
    let user = UserRepo::create(&pool, &sample_user("alice")).await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.balance, 250.0);

    let by_email = UserRepo::find_by_email(&pool, "ALICE@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);

    let by_either = UserRepo::find_by_email_or_username(&pool, "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_either.id, user.id);

    assert!(UserRepo::find_by_id(&pool, user.id + 999)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
    UserRepo::create(&pool, &sample_user("bob")).await.unwrap();

    let mut dup = sample_user("bob2");
    dup.email = "bob@example.com".to_string();
    let err = UserRepo::create(&pool, &dup).await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert!(db_err.constraint().unwrap_or("").starts_with("uq_"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_applies_only_set_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &sample_user("carol")).await.unwrap();

    let patch = UpdateProfile {
        username: None,
        bio: Some("collector of pixels".to_string()),
        avatar_seed: None,
    };
    let updated = UserRepo::update_profile(&pool, user.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.username, "carol");
    assert_eq!(updated.bio.as_deref(), Some("collector of pixels"));
    assert_eq!(updated.avatar_seed.as_deref(), Some("carol"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nft_list_filters_and_pagination(pool: PgPool) {
    let creator = UserRepo::create(&pool, &sample_user("minter")).await.unwrap();

    for i in 0..15 {
        let on_sale = i % 2 == 0;
        NftRepo::create(
            &pool,
            &sample_nft(&format!("Orb{i:02}"), creator.id, 10.0 + i as f64, on_sale),
        )
        .await
        .unwrap();
    }

    let params = NftListParams {
        page: 2,
        limit: 12,
        sort: NftSort::New,
        ..Default::default()
    };
    let (items, total) = NftRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 15);
    assert_eq!(items.len(), 3);

    let params = NftListParams {
        page: 1,
        limit: 48,
        on_sale: Some(true),
        sort: NftSort::PriceAsc,
        ..Default::default()
    };
    let (items, total) = NftRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 8);
    assert!(items.windows(2).all(|w| w[0].price <= w[1].price));

    let params = NftListParams {
        page: 1,
        limit: 48,
        min_price: Some(20.0),
        max_price: Some(22.0),
        ..Default::default()
    };
    let (_, total) = NftRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 3);

    let params = NftListParams {
        page: 1,
        limit: 48,
        q: Some("orb0".to_string()),
        ..Default::default()
    };
    let (_, total) = NftRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 10);

    let params = NftListParams {
        page: 1,
        limit: 48,
        rarity: Some("Rare".to_string()),
        ..Default::default()
    };
    let (_, total) = NftRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 15);

    let params = NftListParams {
        page: 1,
        limit: 48,
        rarity: Some("Mythic".to_string()),
        ..Default::default()
    };
    let (_, total) = NftRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_and_unlisting(pool: PgPool) {
    let owner = UserRepo::create(&pool, &sample_user("seller")).await.unwrap();
    let nft = NftRepo::create(&pool, &sample_nft("Idle", owner.id, 0.0, false))
        .await
        .unwrap();
    assert!(!nft.on_sale);

    let listed = NftRepo::set_listing(&pool, nft.id, 42.5).await.unwrap().unwrap();
    assert!(listed.on_sale);
    assert_eq!(listed.price, 42.5);

    let unlisted = NftRepo::unlist(&pool, nft.id).await.unwrap().unwrap();
    assert!(!unlisted.on_sale);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_sale_transfers_ownership_and_funds(pool: PgPool) {
    let seller = UserRepo::create(&pool, &sample_user("vendor")).await.unwrap();
    let buyer = UserRepo::create(&pool, &sample_user("patron")).await.unwrap();
    let nft = NftRepo::create(&pool, &sample_nft("Prism", seller.id, 100.0, true))
        .await
        .unwrap();

    let outcome = NftRepo::execute_sale(&pool, nft.id, buyer.id).await.unwrap();
    assert_eq!(outcome, SaleOutcome::Completed);

    let nft = NftRepo::find_by_id(&pool, nft.id).await.unwrap().unwrap();
    assert_eq!(nft.owner_id, buyer.id);
    assert!(!nft.on_sale);

    let seller = UserRepo::find_by_id(&pool, seller.id).await.unwrap().unwrap();
    let buyer = UserRepo::find_by_id(&pool, buyer.id).await.unwrap().unwrap();
    assert_eq!(seller.balance, 350.0);
    assert_eq!(buyer.balance, 150.0);

    let history = TransactionRepo::list_by_nft(&pool, nft.id, 20).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].tx_type, TxType::Sale);
    assert_eq!(history[0].price, Some(100.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_execute_sale_rejects_poor_buyer_and_unlisted(pool: PgPool) {
    let seller = UserRepo::create(&pool, &sample_user("rich")).await.unwrap();
    let buyer = UserRepo::create(&pool, &sample_user("broke")).await.unwrap();
    let pricey = NftRepo::create(&pool, &sample_nft("Crown", seller.id, 9999.0, true))
        .await
        .unwrap();

    let outcome = NftRepo::execute_sale(&pool, pricey.id, buyer.id).await.unwrap();
    assert_eq!(outcome, SaleOutcome::InsufficientFunds);

    // Nothing changed.
    let buyer_row = UserRepo::find_by_id(&pool, buyer.id).await.unwrap().unwrap();
    assert_eq!(buyer_row.balance, 250.0);
    let nft = NftRepo::find_by_id(&pool, pricey.id).await.unwrap().unwrap();
    assert_eq!(nft.owner_id, seller.id);

    let idle = NftRepo::create(&pool, &sample_nft("Idle2", seller.id, 1.0, false))
        .await
        .unwrap();
    let outcome = NftRepo::execute_sale(&pool, idle.id, buyer.id).await.unwrap();
    assert_eq!(outcome, SaleOutcome::NotOnSale);

    // Buying your own NFT is treated the same as an unlisted one.
    let own = NftRepo::create(&pool, &sample_nft("Mirror", seller.id, 1.0, true))
        .await
        .unwrap();
    let outcome = NftRepo::execute_sale(&pool, own.id, seller.id).await.unwrap();
    assert_eq!(outcome, SaleOutcome::NotOnSale);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collections_and_volume_rollup(pool: PgPool) {
    let creator = UserRepo::create(&pool, &sample_user("curator")).await.unwrap();

    let collection = CollectionRepo::create(
        &pool,
        &CreateCollection {
            name: "Auroras".to_string(),
            description: None,
            category: "art".to_string(),
            creator_id: creator.id,
            cover_seed: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(collection.item_count, 0);
    assert!(!collection.verified);

    let mut input = sample_nft("Aurora1", creator.id, 50.0, true);
    input.collection_id = Some(collection.id);
    let nft = NftRepo::create(&pool, &input).await.unwrap();
    CollectionRepo::increment_item_count(&pool, collection.id).await.unwrap();

    let buyer = UserRepo::create(&pool, &sample_user("fan")).await.unwrap();
    let outcome = NftRepo::execute_sale(&pool, nft.id, buyer.id).await.unwrap();
    assert_eq!(outcome, SaleOutcome::Completed);

    let collection = CollectionRepo::find_by_id(&pool, collection.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(collection.item_count, 1);
    assert_eq!(collection.volume_traded, 50.0);

    let since = chrono::Utc::now() - chrono::Duration::hours(1);
    let top = TransactionRepo::top_collections_since(&pool, since, 5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].collection_id, collection.id);
    assert_eq!(top[0].volume, 50.0);

    let fetched = CollectionRepo::find_by_ids(&pool, &[collection.id]).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].name, "Auroras");

    // The sold NFT is no longer listed, so nothing trends, but it is still
    // the newest mint.
    assert!(NftRepo::newest_on_sale(&pool, 8).await.unwrap().is_empty());
    assert_eq!(NftRepo::newest(&pool, 6).await.unwrap().len(), 1);

    let params = CollectionListParams {
        page: 1,
        limit: 12,
        category: Some("art".to_string()),
        ..Default::default()
    };
    let (items, total) = CollectionRepo::list(&pool, &params).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Auroras");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ledger_totals(pool: PgPool) {
    let creator = UserRepo::create(&pool, &sample_user("ledger")).await.unwrap();
    let nft = NftRepo::create(&pool, &sample_nft("Entry", creator.id, 0.0, false))
        .await
        .unwrap();

    TransactionRepo::create(
        &pool,
        &CreateTransaction {
            tx_type: TxType::Mint,
            nft_id: nft.id,
            from_user_id: None,
            to_user_id: Some(creator.id),
            price: None,
        },
    )
    .await
    .unwrap();

    let since = chrono::Utc::now() - chrono::Duration::hours(1);
    assert_eq!(TransactionRepo::count_sales_since(&pool, since).await.unwrap(), 0);

    let (sales, volume) = TransactionRepo::sales_totals_since(&pool, since).await.unwrap();
    assert_eq!(sales, 0);
    assert_eq!(volume, 0.0);

    assert_eq!(TransactionRepo::total_earned(&pool, creator.id).await.unwrap(), 0.0);
    assert_eq!(TransactionRepo::total_spent(&pool, creator.id).await.unwrap(), 0.0);
}
