//! Artifact Pipeline
//!
//! Stages a generated image to a temporary local file (decoding base64 or
//! downloading the provider URL), uploads it to the object-storage bucket,
//! and removes the staging file after the upload attempt, success or
//! failure.
//!
//! Upload failure does not fail the request: it is logged and the public
//! URL is returned anyway, so callers may receive a URL that does not
//! correspond to a stored object. Kept as-is pending product confirmation;
//! see DESIGN.md.

use crate::error::ApiError;
use crate::provider::ImagePayload;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Object-storage configuration for uploaded artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Bucket receiving generated images.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Upload endpoint; the bucket and object name are appended as query
    /// parameters.
    #[serde(default = "default_upload_endpoint")]
    pub upload_endpoint: String,

    /// Public base URL under which uploaded objects are served.
    #[serde(default = "default_public_base")]
    pub public_base: String,
}

fn default_bucket() -> String {
    "omni-meme-food-factory".to_string()
}

fn default_upload_endpoint() -> String {
    "https://storage.googleapis.com/upload/storage/v1".to_string()
}

fn default_public_base() -> String {
    "https://storage.cloud.google.com".to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            upload_endpoint: default_upload_endpoint(),
            public_base: default_public_base(),
        }
    }
}

/// Uploads staged image files to object storage.
pub struct ArtifactStore {
    http: reqwest::Client,
    config: ArtifactConfig,
}

impl ArtifactStore {
    pub fn new(config: ArtifactConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Public URL under which `object_name` is served once uploaded.
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.public_base, self.config.bucket, object_name
        )
    }

    /// Stage `payload` locally, upload it as `object_name`, and return the
    /// public URL. Staging or upload failures are logged, the temp file is
    /// removed either way, and the URL is still returned.
    pub async fn store_image(&self, payload: ImagePayload, object_name: &str) -> String {
        let url_path = self.public_url(object_name);
        if let Err(err) = self.stage_and_upload(payload, object_name).await {
            warn!(object_name, error = %err, "artifact upload failed");
        }
        url_path
    }

    async fn stage_and_upload(
        &self,
        payload: ImagePayload,
        object_name: &str,
    ) -> Result<(), ApiError> {
        // NamedTempFile unlinks on drop, so the staging file is removed no
        // matter how this function exits.
        let staging = tempfile::NamedTempFile::new()
            .map_err(|e| ApiError::UploadError(format!("failed to create staging file: {}", e)))?;

        let bytes = match payload {
            ImagePayload::B64Json(encoded) => BASE64
                .decode(encoded.as_bytes())
                .map_err(|e| ApiError::UploadError(format!("invalid base64 image: {}", e)))?,
            ImagePayload::Url(url) => self.download(&url).await?,
        };
        tokio::fs::write(staging.path(), &bytes)
            .await
            .map_err(|e| ApiError::UploadError(format!("failed to stage image: {}", e)))?;

        self.upload(staging.path(), object_name).await?;
        info!(object_name, "artifact uploaded");
        Ok(())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::UploadError(format!("image download failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ApiError::UploadError(format!("image download failed: {}", e)))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::UploadError(format!("image download failed: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, path: &std::path::Path, object_name: &str) -> Result<(), ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::UploadError(format!("failed to read staging file: {}", e)))?;

        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            self.config.upload_endpoint, self.config.bucket, object_name
        );
        self.http
            .post(url)
            .header("content-type", "image/png")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ApiError::UploadError(format!("upload failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ApiError::UploadError(format!("upload failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_joins_bucket_and_object() {
        let store = ArtifactStore::new(ArtifactConfig::default());
        assert_eq!(
            store.public_url("abc.png"),
            "https://storage.cloud.google.com/omni-meme-food-factory/abc.png"
        );
    }

    #[tokio::test]
    async fn test_store_image_returns_url_even_when_upload_fails() {
        let config = ArtifactConfig {
            upload_endpoint: "http://127.0.0.1:1/unreachable".to_string(),
            ..ArtifactConfig::default()
        };
        let store = ArtifactStore::new(config);
        let payload = ImagePayload::B64Json(BASE64.encode(b"not really a png"));
        let url = store.store_image(payload, "abc.png").await;
        assert!(url.ends_with("/omni-meme-food-factory/abc.png"));
    }
}
