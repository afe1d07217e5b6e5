//! NFT trait attributes and the derived rarity score.

use serde::{Deserialize, Serialize};

/// A single trait on an NFT, e.g. `{ "trait_type": "Background", "value": "Teal" }`.
///
/// Stored as a JSONB array on the `nfts` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
}

/// Weight assigned to each named rarity tier. Unknown tiers count as common.
fn rarity_weight(rarity: Option<&str>) -> f64 {
    match rarity {
        Some("Uncommon") => 2.0,
        Some("Rare") => 3.0,
        Some("Epic") => 4.0,
        Some("Legendary") => 5.0,
        Some("Mythic") => 6.0,
        _ => 1.0,
    }
}

/// Derive a rarity score in `[0, 100]` from an attribute list.
///
/// The score is the mean tier weight scaled by 10 and capped at 100, so an
/// all-Mythic NFT scores 60 and an all-common one scores 10. An empty
/// attribute list scores 0.
pub fn rarity_score(attributes: &[Attribute]) -> f64 {
    if attributes.is_empty() {
        return 0.0;
    }
    let total: f64 = attributes
        .iter()
        .map(|a| rarity_weight(a.rarity.as_deref()))
        .sum();
    let score = (total / attributes.len() as f64 * 10.0).round();
    score.min(100.0)
}
