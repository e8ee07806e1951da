//! OpenAI-compatible provider client.
//!
//! Talks to the chat completions API for recipe text and the images API for
//! image generation. "Provider returned no content" is an error distinct
//! from transport failures so the handler can report it cleanly.

use crate::error::ApiError;
use crate::provider::{
    ImagePayload, ImageRequest, ImageResponseFormat, ModelProviderClient, ProviderConfig,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Provider client over an OpenAI-compatible HTTP API.
pub struct OpenAiClient {
    http: reqwest::Client,
    config: ProviderConfig,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Build a client from provider configuration. Resolves the API key
    /// eagerly so a missing key is a startup error.
    pub fn new(config: ProviderConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let api_key = config.resolve_api_key()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            api_key,
        })
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.resolved_endpoint(), path);
        let builder = self.http.post(url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
    b64_json: Option<String>,
}

#[async_trait]
impl ModelProviderClient for OpenAiClient {
    async fn generate_recipe(&self, prompt: &str) -> Result<String, ApiError> {
        debug!(model = %self.config.chat_model, "requesting recipe completion");
        let body = json!({
            "model": self.config.chat_model,
            "messages": [{
                "role": "user",
                "content": format!("Write a recipe for {}.", prompt),
            }],
        });

        let response: ChatCompletionResponse = self
            .request("/chat/completions")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::ProviderError(format!("chat completion failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ApiError::ProviderError(format!("chat completion failed: {}", e)))?
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("malformed completion response: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ApiError::ProviderError("provider returned no content".to_string()))
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImagePayload, ApiError> {
        debug!(model = %self.config.image_model, size = %request.size, "requesting image generation");
        let body = json!({
            "model": self.config.image_model,
            "prompt": request.prompt,
            "size": request.size,
            "quality": request.quality,
            "n": request.n,
            "response_format": request.response_format,
        });

        let response: ImageGenerationResponse = self
            .request("/images/generations")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::ProviderError(format!("image generation failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ApiError::ProviderError(format!("image generation failed: {}", e)))?
            .json()
            .await
            .map_err(|e| ApiError::ProviderError(format!("malformed image response: {}", e)))?;

        let datum = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ProviderError("provider returned no image".to_string()))?;

        match request.response_format {
            ImageResponseFormat::B64Json => datum
                .b64_json
                .map(ImagePayload::B64Json)
                .ok_or_else(|| ApiError::ProviderError("provider returned no image".to_string())),
            ImageResponseFormat::Url => datum
                .url
                .map(ImagePayload::Url)
                .ok_or_else(|| ApiError::ProviderError("provider returned no image".to_string())),
        }
    }
}
