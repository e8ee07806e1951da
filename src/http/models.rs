//! Wire DTOs for the HTTP surface.
//!
//! Request fields mirror the JSON bodies of the original frontend, including
//! the `isFake` alias and the generous defaults.

use crate::provider::ImageResponseFormat;
use crate::types::ReviewRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateAndUploadRequest {
    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default = "default_size")]
    pub size: String,

    #[serde(default = "default_quality")]
    pub quality: String,

    #[serde(default = "default_n")]
    pub n: u32,

    #[serde(default)]
    pub response_format: ImageResponseFormat,

    /// Bypass the provider and return canned content.
    #[serde(default = "default_true", alias = "isFake")]
    pub is_fake: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default = "default_true", alias = "isFake")]
    pub is_fake: bool,
}

fn default_prompt() -> String {
    "Sichuan hotpot".to_string()
}

fn default_size() -> String {
    "1024x1024".to_string()
}

fn default_quality() -> String {
    "standard".to_string()
}

fn default_n() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct GenerateAndUploadResponse {
    pub message: String,
    pub url_path: String,
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipeResponse {
    pub message: String,
    pub recipe: String,
}

/// Fields are optional so missing ones surface as a 400 with a descriptive
/// message rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub food_address: Option<String>,
    pub user_address: Option<String>,
    pub text: Option<String>,

    /// Optional integrity hash, checked only when verification is enabled.
    pub hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewRecord>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
