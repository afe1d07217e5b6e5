//! HTTP API for the Spectra NFT marketplace.
//!
//! Exposes auth, user, NFT, collection, market, image, and upload endpoints
//! plus a WebSocket ticker. Library form so integration tests can build the
//! router without binding a socket.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
pub mod ws;
