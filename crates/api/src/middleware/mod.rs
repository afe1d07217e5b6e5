//! Request middleware: cookie auth, response caching, and rate limiting.

pub mod auth;
pub mod cache;
pub mod rate_limit;
