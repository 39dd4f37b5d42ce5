//! Radiomic Feature Engine
//!
//! Runs a feature extractor once per mask label, buckets the named features
//! into groups by image-transform origin, and accumulates one table per group
//! with labels as columns and feature names as rows.

mod aggregator;
mod classify;
mod error;
mod extractor;
mod group;
mod table;

pub use aggregator::{Aggregation, AggregationReport, FeatureAggregator};
pub use classify::{ClassificationPolicy, Rule};
pub use error::{AggregationError, ExtractionError, UnknownFilter};
pub use extractor::{from_fn, FeatureExtractor, FeatureMap, FeatureValue, FnExtractor};
pub use group::{FeatureGroup, GroupSet, ImageFilter, SubBand};
pub use table::{column_header, FeatureRow, FeatureTable};

pub use label_mask::{Label, LabelMask};
