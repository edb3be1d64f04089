//! CLI command definitions and dispatch.

pub mod availability;
pub mod config;
pub mod review;
pub mod submit;
pub mod week;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use roombook_core::config::AppConfig;
use roombook_core::error::AppError;
use roombook_engine::BookingEngine;
use roombook_realtime::{MemoryDocumentStore, build_notifier};

use crate::output::OutputFormat;

/// Roombook: classroom availability and reservation requests
#[derive(Debug, Parser)]
#[command(name = "roombook", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; when omitted, `config/default` and
    /// `config/<env>` are merged with `ROOMBOOK__*` variables
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment overlay to load from `config/`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// JSON file with an array of reservation documents to preload. A
    /// string `id` field becomes the document key
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the current booking week
    Week(week::WeekArgs),
    /// Show room availability for one day
    Availability(availability::AvailabilityArgs),
    /// Submit a reservation request
    Submit(submit::SubmitArgs),
    /// List reservations awaiting review
    Pending,
    /// Accept a pending reservation
    Accept(review::DecisionArgs),
    /// Reject a pending reservation
    Reject(review::DecisionArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Week(args) => {
                let session = Session::open(config, self.seed.as_deref()).await?;
                week::execute(args, &session, self.format)
            }
            Commands::Availability(args) => {
                let session = Session::open(config, self.seed.as_deref()).await?;
                availability::execute(args, &session, self.format).await
            }
            Commands::Submit(args) => {
                let session = Session::open(config, self.seed.as_deref()).await?;
                submit::execute(args, &session, self.format).await
            }
            Commands::Pending => {
                let session = Session::open(config, self.seed.as_deref()).await?;
                review::list(&session, self.format).await
            }
            Commands::Accept(args) => {
                let session = Session::open(config, self.seed.as_deref()).await?;
                review::accept(args, &session, self.format).await
            }
            Commands::Reject(args) => {
                let session = Session::open(config, self.seed.as_deref()).await?;
                review::reject(args, &session, self.format).await
            }
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }
}

/// An engine over a fresh in-memory store, synced once.
#[derive(Debug)]
pub struct Session {
    /// The booking engine.
    pub engine: BookingEngine,
    /// The backing store.
    pub store: Arc<MemoryDocumentStore>,
    /// Loaded configuration.
    pub config: AppConfig,
}

impl Session {
    /// Build the store and engine, load the seed file, and mirror the
    /// pending collection.
    pub async fn open(config: AppConfig, seed: Option<&Path>) -> Result<Self, AppError> {
        let store = Arc::new(MemoryDocumentStore::new(config.store.channel_buffer));
        if let Some(path) = seed {
            let documents = read_seed(path).await?;
            let ids = store.seed(&config.store.pending_collection, documents);
            info!(path = %path.display(), documents = ids.len(), "Seeded reservation documents");
        }

        let notifier = build_notifier(&config.notifications)?;
        let engine = BookingEngine::new(&config, store.clone(), notifier)?;
        let outcome = engine.sync_once().await?;
        if outcome.skipped > 0 {
            tracing::warn!(skipped = outcome.skipped, "Some seeded documents could not be decoded");
        }

        Ok(Self {
            engine,
            store,
            config,
        })
    }
}

/// Read a JSON array of documents.
async fn read_seed(path: &Path) -> Result<Vec<serde_json::Value>, AppError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::internal(format!("Failed to read seed file '{}': {e}", path.display()))
    })?;
    let documents: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    Ok(documents)
}
