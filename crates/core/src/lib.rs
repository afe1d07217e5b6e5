//! Spectra marketplace domain primitives.
//!
//! Shared building blocks used by the database and API crates: the domain
//! error type, common type aliases, the NFT attribute/rarity model, and the
//! deterministic placeholder-image generator.

pub mod attributes;
pub mod error;
pub mod svg;
pub mod types;
