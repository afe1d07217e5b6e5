//! HTTP-level integration tests for collections, market stats, public
//! profiles, and the SVG image endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json_auth, register_user};
use http_body_util::BodyExt;
use sqlx::PgPool;

/// Create a collection via the API and return its JSON.
async fn create_collection(app: &axum::Router, cookie: &str, name: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "name": name,
        "description": format!("{name} description"),
        "category": "Art",
    });
    let response = post_json_auth(app, "/collections", body, cookie).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_create_and_detail(pool: PgPool) {
    let app = build_test_app(pool);
    let (user, cookie) = register_user(&app, "curator").await;

    let collection = create_collection(&app, &cookie, "Auroras").await;
    assert_eq!(collection["name"], "Auroras");
    assert_eq!(collection["category"], "art");
    assert_eq!(collection["creator_id"], user["id"]);
    assert_eq!(collection["cover_seed"], "auroras");
    assert_eq!(collection["verified"], false);
    assert_eq!(collection["item_count"], 0);

    let id = collection["id"].as_i64().unwrap();

    // Mint into the collection; the detail view picks it up.
    let mint = post_json_auth(
        &app,
        "/nfts",
        serde_json::json!({ "name": "Aurora One", "collectionId": id }),
        &cookie,
    )
    .await;
    assert_eq!(mint.status(), StatusCode::CREATED);

    let detail = body_json(get(&app, &format!("/collections/{id}")).await).await;
    assert_eq!(detail["data"]["collection"]["item_count"], 1);
    let nfts = detail["data"]["nfts"].as_array().unwrap();
    assert_eq!(nfts.len(), 1);
    assert_eq!(nfts[0]["name"], "Aurora One");

    let missing = get(&app, "/collections/999999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_list_filters(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, cookie) = register_user(&app, "builder").await;

    create_collection(&app, &cookie, "Alpha").await;
    create_collection(&app, &cookie, "Beta").await;

    let json = body_json(get(&app, "/collections").await).await;
    assert_eq!(json["data"]["total"], 2);

    let json = body_json(get(&app, "/collections?q=alp").await).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["name"], "Alpha");

    let json = body_json(get(&app, "/collections?category=music").await).await;
    assert_eq!(json["data"]["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_create_requires_auth(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json_auth(
        &app,
        "/collections",
        serde_json::json!({ "name": "Nope", "category": "art" }),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_market_stats_reflect_sales(pool: PgPool) {
    let app = build_test_app(pool);
    let (_, seller_cookie) = register_user(&app, "dealer").await;
    let (_, buyer_cookie) = register_user(&app, "collector").await;

    let collection = create_collection(&app, &seller_cookie, "Embers").await;
    let collection_id = collection["id"].as_i64().unwrap();

    let mint = post_json_auth(
        &app,
        "/nfts",
        serde_json::json!({ "name": "Ember", "price": 40.0, "collectionId": collection_id }),
        &seller_cookie,
    )
    .await;
    let nft = body_json(mint).await["data"].clone();
    let id = nft["id"].as_i64().unwrap();

    post_json_auth(
        &app,
        &format!("/nfts/{id}/buy"),
        serde_json::json!({}),
        &buyer_cookie,
    )
    .await;

    let json = body_json(get(&app, "/market/stats").await).await;
    let stats = &json["data"];
    assert!(stats["timestamp"].is_string());
    assert_eq!(stats["totals"]["sales24h"], 1);
    assert_eq!(stats["totals"]["volume24h"], 40.0);

    let top = stats["topCollections"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["collectionId"], collection_id);
    assert_eq!(top[0]["volume"], 40.0);
    assert_eq!(top[0]["sales"], 1);
    assert_eq!(top[0]["collection"]["name"], "Embers");

    // The only NFT was just sold, so nothing is listed but it still counts
    // as the newest mint.
    assert!(stats["trendingNfts"].as_array().unwrap().is_empty());
    assert_eq!(stats["featured"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_profile(pool: PgPool) {
    let app = build_test_app(pool);
    let (user, cookie) = register_user(&app, "publico").await;
    let id = user["id"].as_i64().unwrap();

    post_json_auth(
        &app,
        "/nfts",
        serde_json::json!({ "name": "Solo" }),
        &cookie,
    )
    .await;

    let json = body_json(get(&app, &format!("/users/{id}")).await).await;
    assert_eq!(json["data"]["user"]["username"], "publico");
    assert_eq!(json["data"]["ownedNfts"], 1);
    assert_eq!(json["data"]["createdNfts"], 1);
    assert_eq!(json["data"]["createdCollections"], 0);

    let missing = get(&app, "/users/999999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_image_endpoint_serves_svg(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/image/dragon.svg?size=400").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/svg+xml"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let svg = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("width=\"400\""));

    // The `.svg` suffix is cosmetic; the same seed renders identically.
    let plain = get(&app, "/image/dragon?size=400").await;
    let plain_bytes = plain.into_body().collect().await.unwrap().to_bytes();
    let plain_svg = String::from_utf8(plain_bytes.to_vec()).unwrap();
    assert_eq!(plain_svg, svg);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_endpoint(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
