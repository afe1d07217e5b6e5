//! Procedural SVG image endpoint.
//!
//! Every NFT and avatar renders from a seed string, so the marketplace needs
//! no media storage for its default art.

use axum::extract::{Path, Query};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use spectra_core::svg;

use crate::query::ImageQuery;

/// GET /image/{seed}
///
/// Deterministic SVG artwork for the given seed. A `.svg` suffix on the
/// seed is accepted and stripped so the URL can look like a file path.
/// `?size=` clamps to the generator's supported range.
pub async fn generate(Path(seed): Path<String>, Query(query): Query<ImageQuery>) -> Response {
    let seed = seed.strip_suffix(".svg").unwrap_or(&seed);
    let body = svg::generate(seed, query.size);

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400, immutable"),
        ],
        body,
    )
        .into_response()
}
