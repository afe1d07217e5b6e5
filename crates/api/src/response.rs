//! Shared response envelope types for API handlers.
//!
//! All API responses use the `{ "success": true, "data": ... }` envelope.
//! Use [`ApiResponse`] instead of ad-hoc `serde_json::json!` calls to get
//! compile-time type safety and consistent serialization.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use std::convert::Infallible;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::new(items, request_id)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, request_id: RequestId) -> Self {
        Self {
            success: true,
            data,
            message: None,
            request_id: request_id.0,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>, request_id: RequestId) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            request_id: request_id.0,
        }
    }
}

/// Request ID extractor, reading the `x-request-id` header set by the
/// request-id middleware. Always succeeds; absent header yields `None`.
#[derive(Debug, Clone)]
pub struct RequestId(pub Option<String>);

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        Ok(RequestId(id))
    }
}
