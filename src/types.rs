//! Core types for the pantry generation and review backend.

use serde::{Deserialize, Serialize};

/// Outcome of the most recent image generation, as written to the cache
/// sentinel keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Identifier minted for the generation request.
    pub uuid: String,
    /// Public location of the uploaded image.
    pub url_path: String,
    /// Short display name derived from the prompt.
    pub name: String,
}

/// Displayable information about a food item: either a pre-seeded blob
/// stored under the item's own identifier, or synthesized from the latest
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodInfo {
    pub name: String,
    pub url_path: String,
    pub recipe: String,
}

/// One user review of a food item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Opaque identifier of the reviewer.
    pub user_address: String,
    /// Free-form review text.
    pub text: String,
}
