//! Imaging Backend Capability
//!
//! Feature extraction, filtered-image generation and image I/O all live in
//! native imaging libraries. The tool reaches them only through this trait.

use crate::settings::{ConfigurationError, ExtractionSettings};
use feature_engine::{ExtractionError, FeatureExtractor, ImageFilter, LabelMask};
use std::io;
use std::path::Path;

/// One derived image, named the way the backend names its outputs
/// (e.g. `wavelet-LLH`, `log-sigma-1-0-mm-3D`)
pub struct FilteredImage<I> {
    pub name: String,
    pub image: I,
}

/// Lazy, finite sequence of filtered images; consumed once
pub type FilteredImages<'a, I> = Box<dyn Iterator<Item = Result<FilteredImage<I>, ExtractionError>> + 'a>;

/// Native imaging library bound to one tool run
pub trait ImagingBackend {
    /// In-memory image type
    type Image;
    /// Extractor built from validated settings
    type Extractor: FeatureExtractor<Self::Image>;

    /// Build an extractor; settings the backend does not support are rejected here
    fn extractor(&self, settings: &ExtractionSettings) -> Result<Self::Extractor, ConfigurationError>;

    /// Derived images for `filter`, for upload next to the feature tables
    fn filtered_images<'a>(
        &'a self,
        image: &'a Self::Image,
        mask: &'a LabelMask,
        filter: ImageFilter,
        settings: &'a ExtractionSettings,
    ) -> Result<FilteredImages<'a, Self::Image>, ExtractionError>;

    /// Save an image to `path` in the backend's on-disk format
    fn save_image(&self, image: &Self::Image, path: &Path) -> io::Result<()>;
}
