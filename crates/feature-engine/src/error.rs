//! Feature Engine Error Types

use label_mask::Label;
use thiserror::Error;

/// Errors raised by an extraction or filter-generation backend
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// Image and mask do not share a spatial shape
    #[error("Image shape {image:?} does not match mask shape {mask:?}")]
    ShapeMismatch { image: Vec<usize>, mask: Vec<usize> },

    /// Backend reported a failure while computing features
    #[error("Feature extraction failed: {0}")]
    Backend(String),

    /// Backend could not produce filtered images
    #[error("Filtered image generation failed for {filter}: {reason}")]
    FilterGeneration { filter: String, reason: String },
}

/// Errors that abort an aggregation run
#[derive(Debug, Error)]
pub enum AggregationError {
    /// The extractor failed on one label; no tables are produced
    #[error("Extraction failed for label {label}")]
    ExtractionFailure {
        label: Label,
        #[source]
        source: ExtractionError,
    },
}

/// Image filter name not known to the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown image filter: {0}")]
pub struct UnknownFilter(pub String);
