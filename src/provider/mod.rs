//! Model Provider Integration
//!
//! Configuration and client interface for the external chat-completion and
//! image-generation provider.

pub mod openai;

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,

    /// Provider type.
    #[serde(default)]
    pub provider_type: ProviderType,

    /// Model used for recipe text generation.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for image generation.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// API key optional and can be loaded from environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL or endpoint provider specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_name: None,
            provider_type: ProviderType::OpenAI,
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            api_key: None,
            endpoint: None,
        }
    }
}

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "local")]
    LocalCustom,
}

impl ProviderConfig {
    /// Endpoint to call, defaulting to the public OpenAI API.
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    /// API key from config, falling back to `OPENAI_API_KEY`. Local
    /// providers don't require one.
    pub fn resolve_api_key(&self) -> Result<Option<String>, ApiError> {
        if let Some(key) = &self.api_key {
            return Ok(Some(key.clone()));
        }
        match self.provider_type {
            ProviderType::OpenAI => match std::env::var("OPENAI_API_KEY") {
                Ok(key) if !key.is_empty() => Ok(Some(key)),
                _ => Err(ApiError::ConfigError(
                    "API key not found (set OPENAI_API_KEY or add to config)".to_string(),
                )),
            },
            ProviderType::LocalCustom => Ok(None),
        }
    }

    /// Validate provider configuration.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.chat_model.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "Chat model name cannot be empty".to_string(),
            ));
        }
        if self.image_model.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "Image model name cannot be empty".to_string(),
            ));
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ApiError::ConfigError(format!(
                    "Invalid endpoint URL: {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

/// Requested format for the generated image payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    #[default]
    Url,
    B64Json,
}

/// Parameters for one image generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub n: u32,
    pub response_format: ImageResponseFormat,
}

/// Payload returned by the image provider, in the requested format.
#[derive(Debug, Clone)]
pub enum ImagePayload {
    /// Short-lived URL hosted by the provider.
    Url(String),
    /// Base64-encoded image bytes.
    B64Json(String),
}

/// Client interface to the generation provider.
#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// Generate recipe text for a prompt.
    async fn generate_recipe(&self, prompt: &str) -> Result<String, ApiError>;

    /// Generate one image and return its payload.
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImagePayload, ApiError>;
}
