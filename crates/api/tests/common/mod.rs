use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use spectra_api::auth::jwt::JwtConfig;
use spectra_api::config::ServerConfig;
use spectra_api::middleware::cache::ResponseCache;
use spectra_api::middleware::rate_limit::{api_rate_limit, RateLimiter};
use spectra_api::routes;
use spectra_api::state::AppState;
use spectra_api::ws::WsManager;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret,
/// avoiding any dependency on the environment.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        cookie_name: "token".to_string(),
        cookie_secure: false,
        upload_dir: std::env::temp_dir()
            .join("spectra-test-uploads")
            .to_string_lossy()
            .into_owned(),
        max_upload_bytes: 10 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            expires_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery, rate limiting, caching) that production uses. Each call
/// gets a fresh cache and limiter so tests do not interfere.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let ws_manager = Arc::new(WsManager::new());
    let cache = Arc::new(ResponseCache::new());
    let limiter = Arc::new(RateLimiter::new());

    let state = AppState {
        pool,
        config: Arc::new(config),
        ws_manager,
        cache,
        limiter,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::api_routes(state.clone()).route_layer(
            axum::middleware::from_fn_with_state(state.clone(), api_rate_limit),
        ))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: &Router, path: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Send a GET request with an auth cookie.
pub async fn get_auth(app: &Router, path: &str, cookie: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(path)
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, path, body, None).await
}

/// Send a POST request with a JSON body and auth cookie.
pub async fn post_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response {
    send_json(app, Method::POST, path, body, Some(cookie)).await
}

/// Send a PUT request with a JSON body and auth cookie.
pub async fn put_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response {
    send_json(app, Method::PUT, path, body, Some(cookie)).await
}

/// Send a PATCH request with a JSON body and auth cookie.
pub async fn patch_json_auth(
    app: &Router,
    path: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response {
    send_json(app, Method::PATCH, path, body, Some(cookie)).await
}

async fn send_json(
    app: &Router,
    method: Method,
    path: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Read and deserialize a JSON response body.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Extract the auth cookie (name=value pair) from a `Set-Cookie` header.
pub fn auth_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should carry a Set-Cookie header")
        .to_str()
        .unwrap();
    header
        .split(';')
        .next()
        .expect("cookie header should have a value")
        .to_string()
}

/// Register a user via the API. Returns the user JSON and the auth cookie.
pub async fn register_user(app: &Router, username: &str) -> (serde_json::Value, String) {
    let body = serde_json::json!({
        "email": format!("{username}@test.com"),
        "username": username,
        "password": "Passw0rd!test",
    });
    let response = post_json(app, "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = auth_cookie(&response);
    let json = body_json(response).await;
    (json["data"].clone(), cookie)
}
