//! Pantry service binary.
//!
//! `pantry serve` runs the HTTP service; `pantry seed` loads pre-seeded
//! food-info blobs into the store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pantry::artifact::ArtifactStore;
use pantry::cache::GenerationCache;
use pantry::config::{ConfigLoader, PantryConfig};
use pantry::http::{self, AppState};
use pantry::ledger::validation::Blake3Validator;
use pantry::ledger::ReviewLedger;
use pantry::logging;
use pantry::provider::openai::OpenAiClient;
use pantry::store::persistence::SledKeyValueStore;
use pantry::store::KeyValueStore;
use pantry::types::FoodInfo;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Pantry - generation and review backend
#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Generation and review backend for AI-generated food content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    log_format: Option<String>,

    /// Log output (stdout, stderr, both)
    #[arg(long)]
    log_output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load pre-seeded food info blobs into the store
    Seed {
        /// JSON file mapping identifiers to {name, url_path, recipe}
        #[arg(long)]
        file: PathBuf,
    },
}

fn apply_log_overrides(config: &mut PantryConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        config.logging.output = output.clone();
    }
}

fn open_store(config: &PantryConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store_path = config.storage.resolve_store_path()?;
    std::fs::create_dir_all(&store_path)
        .with_context(|| format!("failed to create store directory {}", store_path.display()))?;
    // Open failure (lock held, disk error) is fatal here, never per-request.
    let store = SledKeyValueStore::new(&store_path)
        .with_context(|| format!("failed to open store at {}", store_path.display()))?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    apply_log_overrides(&mut config, &cli);
    logging::init_logging(Some(&config.logging))?;

    match &cli.command {
        Commands::Serve { bind } => {
            let store = open_store(&config)?;
            let cache = Arc::new(GenerationCache::new(store.clone()));

            let mut ledger = ReviewLedger::new(store);
            if config.ledger.verify_hashes {
                ledger = ledger.with_validator(Box::new(Blake3Validator));
                info!("review hash verification enabled");
            }

            let provider = OpenAiClient::new(config.provider.clone())
                .context("failed to build provider client")?;
            let artifacts = ArtifactStore::new(config.artifact.clone());

            let state = AppState {
                cache,
                ledger: Arc::new(ledger),
                provider: Arc::new(provider),
                artifacts: Arc::new(artifacts),
            };

            let router = http::build_router(state, &config.server)?;
            let bind = bind.as_deref().unwrap_or(&config.server.bind);
            http::serve(router, bind).await?;
        }
        Commands::Seed { file } => {
            let store = open_store(&config)?;
            let cache = GenerationCache::new(store);

            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read seed file {}", file.display()))?;
            let entries: BTreeMap<String, FoodInfo> =
                serde_json::from_str(&content).context("seed file is not a valid identifier map")?;

            let count = entries.len();
            for (identifier, info) in &entries {
                cache.seed(identifier, info)?;
            }
            info!(count, "seeded food info blobs");
            println!("Seeded {} entries.", count);
        }
    }

    Ok(())
}
