//! HTTP handlers, one module per resource.

pub mod auth;
pub mod collections;
pub mod images;
pub mod market;
pub mod nfts;
pub mod upload;
pub mod users;
