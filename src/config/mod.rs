//! Service configuration.
//!
//! Layered loading: built-in defaults, then an optional `pantry.toml`, then
//! environment variables with the `PANTRY_` prefix (double underscore as
//! the section separator, e.g. `PANTRY_SERVER__BIND`).

use crate::artifact::ArtifactConfig;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PantryConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Origin allowed by the CORS layer.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Embedded store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory; defaults to the platform data directory.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store directory, falling back to the platform data dir.
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let project_dirs = directories::ProjectDirs::from("", "pantry", "pantry").ok_or_else(
            || ApiError::ConfigError("Could not determine platform data directory".to_string()),
        )?;
        Ok(project_dirs.data_dir().join("store"))
    }
}

/// Review ledger settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Verify caller-supplied review hashes before appending. Off by
    /// default; reviews are accepted unverified.
    #[serde(default)]
    pub verify_hashes: bool,
}

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file plus environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<PantryConfig, ApiError> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::with_name("pantry").required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PantryConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.cors_origin, "http://localhost:5173");
        assert!(!config.ledger.verify_hashes);
        assert_eq!(config.storage.store_path, None);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("pantry.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "0.0.0.0:9000"

[storage]
store_path = "/var/lib/pantry/store"

[ledger]
verify_hashes = true
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(
            config.storage.store_path,
            Some(PathBuf::from("/var/lib/pantry/store"))
        );
        assert!(config.ledger.verify_hashes);
        // Untouched sections keep their defaults.
        assert_eq!(config.artifact.bucket, "omni-meme-food-factory");
    }

    #[test]
    fn test_explicit_store_path_wins() {
        let storage = StorageConfig {
            store_path: Some(PathBuf::from("/tmp/pantry-store")),
        };
        assert_eq!(
            storage.resolve_store_path().unwrap(),
            PathBuf::from("/tmp/pantry-store")
        );
    }
}
