//! HTTP surface contracts: routes, status codes, and response bodies.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http_body_util::BodyExt;
use pantry::artifact::{ArtifactConfig, ArtifactStore};
use pantry::cache::{self, GenerationCache};
use pantry::config::ServerConfig;
use pantry::error::ApiError;
use pantry::http::{build_router, AppState};
use pantry::ledger::ReviewLedger;
use pantry::provider::{ImagePayload, ImageRequest, ModelProviderClient};
use pantry::store::persistence::SledKeyValueStore;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Provider stub returning canned content without any network traffic.
struct StubProvider;

#[async_trait]
impl ModelProviderClient for StubProvider {
    async fn generate_recipe(&self, prompt: &str) -> Result<String, ApiError> {
        Ok(format!("Stub recipe for {}.", prompt))
    }

    async fn generate_image(&self, _request: &ImageRequest) -> Result<ImagePayload, ApiError> {
        Ok(ImagePayload::B64Json(BASE64.encode(b"stub image bytes")))
    }
}

/// Provider stub that always fails, for the 500 path.
struct FailingProvider;

#[async_trait]
impl ModelProviderClient for FailingProvider {
    async fn generate_recipe(&self, _prompt: &str) -> Result<String, ApiError> {
        Err(ApiError::ProviderError(
            "provider returned no content".to_string(),
        ))
    }

    async fn generate_image(&self, _request: &ImageRequest) -> Result<ImagePayload, ApiError> {
        Err(ApiError::ProviderError(
            "provider returned no image".to_string(),
        ))
    }
}

fn test_router(provider: Arc<dyn ModelProviderClient>) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(SledKeyValueStore::new(&temp_dir.path().join("store")).unwrap());

    let artifact_config = ArtifactConfig {
        // Point uploads at a closed port so upload attempts fail fast; the
        // endpoints must still report success.
        upload_endpoint: "http://127.0.0.1:1".to_string(),
        ..ArtifactConfig::default()
    };

    let state = AppState {
        cache: Arc::new(GenerationCache::new(store.clone())),
        ledger: Arc::new(ReviewLedger::new(store)),
        provider,
        artifacts: Arc::new(ArtifactStore::new(artifact_config)),
    };
    let router = build_router(state, &ServerConfig::default()).unwrap();
    (router, temp_dir)
}

async fn send_json(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (router, _temp) = test_router(Arc::new(StubProvider));
    let (status, body) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn review_missing_food_address_is_400() {
    let (router, _temp) = test_router(Arc::new(StubProvider));
    let (status, body) = send_json(
        &router,
        "POST",
        "/review",
        r#"{"user_address":"0xuser","text":"tasty"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("food_address"));
}

#[tokio::test]
async fn review_round_trip_is_201_then_listed() {
    let (router, _temp) = test_router(Arc::new(StubProvider));
    let (status, body) = send_json(
        &router,
        "POST",
        "/review",
        r#"{"food_address":"0xfood","user_address":"0xuser","text":"tasty"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].as_str().is_some());

    let (status, body) = get(&router, "/reviews/0xfood").await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["user_address"], "0xuser");
    assert_eq!(reviews[0]["text"], "tasty");
}

#[tokio::test]
async fn reviews_for_unknown_address_is_404() {
    let (router, _temp) = test_router(Arc::new(StubProvider));
    let (status, body) = get(&router, "/reviews/0xunseen").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn fake_generate_returns_canned_url_without_touching_store() {
    let (router, _temp) = test_router(Arc::new(StubProvider));
    let (status, body) = send_json(&router, "POST", "/generate-and-upload", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url_path"], cache::FALLBACK_URL_PATH);
    assert_eq!(body["uuid"], cache::FALLBACK_UUID);

    // Nothing was cached: lookups still serve the fixed default record.
    let (status, body) = get(&router, "/0xanything").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], cache::FALLBACK_NAME);
    assert_eq!(body["recipe"], cache::FALLBACK_RECIPE);
}

#[tokio::test]
async fn fake_recipe_returns_canned_text() {
    let (router, _temp) = test_router(Arc::new(StubProvider));
    let (status, body) =
        send_json(&router, "POST", "/generate-recipe", r#"{"prompt":"anything"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipe"], cache::FALLBACK_RECIPE);
}

#[tokio::test]
async fn real_generation_records_cache_even_when_upload_fails() {
    let (router, _temp) = test_router(Arc::new(StubProvider));

    let (status, body) = send_json(
        &router,
        "POST",
        "/generate-and-upload",
        r#"{"prompt":"mapo tofu with extra chili","isFake":false}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let uuid = body["uuid"].as_str().unwrap().to_string();
    let url_path = body["url_path"].as_str().unwrap().to_string();
    // Upload went to a closed port, yet the URL is still reported.
    assert!(url_path.contains(&uuid));
    assert_eq!(body["name"], "mapo tofu with extra chili");

    // Recipe generation attaches to the latest generation.
    let (status, body) = send_json(
        &router,
        "POST",
        "/generate-recipe",
        r#"{"prompt":"mapo tofu","isFake":false}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipe"], "Stub recipe for mapo tofu.");

    // Unmatched identifiers now resolve to the latest generation.
    let (status, body) = get(&router, "/0xunmatched").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "mapo tofu with extra chili");
    assert_eq!(body["url_path"], url_path);
    assert_eq!(body["recipe"], "Stub recipe for mapo tofu.");
}

#[tokio::test]
async fn provider_failure_is_500_with_error_body() {
    let (router, _temp) = test_router(Arc::new(FailingProvider));
    let (status, body) = send_json(
        &router,
        "POST",
        "/generate-and-upload",
        r#"{"isFake":false}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some());
}
