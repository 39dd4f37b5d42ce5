//! Radiomics Tool Runner
//!
//! Loads and validates tool settings, drives the feature aggregation through
//! an imaging backend, writes the per-group CSV sheets and filtered images,
//! and uploads everything once the whole run has succeeded.

mod backend;
mod manifest;
mod runner;
mod settings;

pub use backend::{FilteredImage, FilteredImages, ImagingBackend};
pub use manifest::RunManifest;
pub use runner::{RadiomicsTool, ToolInputs, MANIFEST_FILE};
pub use settings::{
    ConfigurationError, ExtractionSettings, FeatureClass, ToolSettings, ENV_PREFIX,
};

use artifact_store::StoreError;
use feature_engine::{AggregationError, ExtractionError};
use label_mask::MaskError;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Tool run errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid label mask: {0}")]
    Mask(#[from] MaskError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Initialize human-readable logging
pub fn init_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Initialize JSON logging for platform log collection
pub fn init_json_logging() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
