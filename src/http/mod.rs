//! HTTP surface.
//!
//! Route registration, shared state, and the server loop. JSON in and out;
//! exact status codes on the review endpoints are part of the contract.

pub mod error;
pub mod handlers;
pub mod models;

use crate::cache::GenerationCache;
use crate::config::ServerConfig;
use crate::error::{ApiError, StorageError};
use crate::ledger::ReviewLedger;
use crate::provider::ModelProviderClient;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared per-request state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<GenerationCache>,
    pub ledger: Arc<ReviewLedger>,
    pub provider: Arc<dyn ModelProviderClient>,
    pub artifacts: Arc<crate::artifact::ArtifactStore>,
}

/// Build the service router.
///
/// Static routes are registered alongside the catch-all `/{foodaddr}` info
/// route; axum prefers static matches, so `/healthz` and `/review` are not
/// shadowed.
pub fn build_router(state: AppState, server: &ServerConfig) -> Result<Router, ApiError> {
    let origin: HeaderValue = server
        .cors_origin
        .parse()
        .map_err(|_| ApiError::ConfigError(format!("Invalid CORS origin: {}", server.cors_origin)))?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/generate-and-upload", post(handlers::generate_and_upload))
        .route("/generate-recipe", post(handlers::generate_recipe))
        .route("/review", post(handlers::create_review))
        .route("/reviews/{foodaddr}", get(handlers::list_reviews))
        .route("/{foodaddr}", get(handlers::get_food_info))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Bind and serve until the task is cancelled.
pub async fn serve(router: Router, bind: &str) -> Result<(), ApiError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| ApiError::ConfigError(format!("Failed to bind {}: {}", bind, e)))?;
    info!(%bind, "listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
    Ok(())
}
