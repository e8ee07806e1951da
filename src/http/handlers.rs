//! Request handlers.
//!
//! Thin orchestration per request: optional provider call, optional artifact
//! upload, then a store mutation or lookup, then a JSON response. There is
//! no background processing or multi-step workflow coordination.

use crate::cache;
use crate::error::ApiError;
use crate::http::error::HttpError;
use crate::http::models::{
    CreateReviewRequest, GenerateAndUploadRequest, GenerateAndUploadResponse,
    GenerateRecipeRequest, GenerateRecipeResponse, MessageResponse, ReviewsResponse,
};
use crate::http::AppState;
use crate::provider::ImageRequest;
use crate::types::{GenerationRecord, ReviewRecord};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Short display name derived from the prompt: the first few words,
/// bounded so sentinel values stay small.
fn display_name(prompt: &str) -> String {
    let name: Vec<&str> = prompt.split_whitespace().take(6).collect();
    let mut name = name.join(" ");
    if name.len() > 64 {
        // Truncate on a char boundary so multibyte prompts can't panic.
        let mut cut = 64;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
    name
}

pub async fn generate_and_upload(
    State(state): State<AppState>,
    Json(request): Json<GenerateAndUploadRequest>,
) -> Result<impl IntoResponse, HttpError> {
    if request.is_fake {
        return Ok(Json(GenerateAndUploadResponse {
            message: "Image generated and uploaded successfully.".to_string(),
            url_path: cache::FALLBACK_URL_PATH.to_string(),
            uuid: cache::FALLBACK_UUID.to_string(),
            name: cache::FALLBACK_NAME.to_string(),
        }));
    }

    let image_request = ImageRequest {
        prompt: request.prompt.clone(),
        size: request.size,
        quality: request.quality,
        n: request.n,
        response_format: request.response_format,
    };
    let payload = state.provider.generate_image(&image_request).await?;

    let uuid = Uuid::new_v4().to_string();
    let object_name = format!("{}.png", uuid);
    let url_path = state.artifacts.store_image(payload, &object_name).await;

    let record = GenerationRecord {
        uuid,
        url_path,
        name: display_name(&request.prompt),
    };
    state.cache.record_generation(&record)?;
    info!(uuid = %record.uuid, name = %record.name, "generation recorded");

    Ok(Json(GenerateAndUploadResponse {
        message: "Image generated and uploaded successfully.".to_string(),
        url_path: record.url_path,
        uuid: record.uuid,
        name: record.name,
    }))
}

pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(request): Json<GenerateRecipeRequest>,
) -> Result<impl IntoResponse, HttpError> {
    if request.is_fake {
        // Fake recipes are never persisted.
        return Ok(Json(GenerateRecipeResponse {
            message: "Recipe generated.".to_string(),
            recipe: cache::FALLBACK_RECIPE.to_string(),
        }));
    }

    let recipe = state.provider.generate_recipe(&request.prompt).await?;

    // Associate the recipe with the latest generation, when there is one.
    if let Some(uuid) = state.cache.latest_uuid()? {
        state.cache.record_recipe(&uuid, &recipe)?;
        info!(%uuid, "recipe recorded");
    }

    Ok(Json(GenerateRecipeResponse {
        message: "Recipe generated.".to_string(),
        recipe,
    }))
}

pub async fn get_food_info(
    State(state): State<AppState>,
    Path(food_address): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    // Fallback chain means this endpoint never 404s.
    let info = state.cache.lookup(&food_address)?;
    Ok(Json(info))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(food_address): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = state.ledger.list_reviews(&food_address)?;
    Ok(Json(ReviewsResponse { reviews }))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let food_address = require_field(request.food_address, "food_address")?;
    let user_address = require_field(request.user_address, "user_address")?;
    let text = require_field(request.text, "text")?;

    let record = ReviewRecord { user_address, text };
    state
        .ledger
        .append_review(&food_address, record, request.hash.as_deref())?;
    info!(%food_address, "review appended");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Review recorded.".to_string(),
        }),
    ))
}

fn require_field(value: Option<String>, field: &str) -> Result<String, HttpError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HttpError(ApiError::InvalidRequest(format!(
            "Invalid request. Must include {}",
            field
        )))),
    }
}

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_takes_leading_words() {
        assert_eq!(display_name("Sichuan hotpot"), "Sichuan hotpot");
        assert_eq!(
            display_name("a very long prompt with far too many words in it"),
            "a very long prompt with far"
        );
    }

    #[test]
    fn test_display_name_bounds_length() {
        let prompt = "supercalifragilisticexpialidocious ".repeat(4);
        assert!(display_name(&prompt).len() <= 64);
    }

    #[test]
    fn test_display_name_respects_char_boundaries() {
        let prompt = "麻婆豆腐".repeat(8);
        let name = display_name(&prompt);
        assert!(name.len() <= 64);
        assert!(prompt.starts_with(&name));
    }

    #[test]
    fn test_require_field_rejects_empty_and_missing() {
        assert!(require_field(None, "food_address").is_err());
        assert!(require_field(Some("  ".to_string()), "food_address").is_err());
        assert_eq!(
            require_field(Some("0xfood".to_string()), "food_address").unwrap(),
            "0xfood"
        );
    }
}
