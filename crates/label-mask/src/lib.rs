//! Label Masks
//!
//! Integer segmentation masks where 0 is background and every other value
//! identifies one region of interest.

mod mask;

pub use mask::LabelMask;

use thiserror::Error;

/// Region identifier inside a mask
pub type Label = i64;

/// Value reserved for background voxels
pub const BACKGROUND: Label = 0;

/// Mask construction errors
#[derive(Debug, Clone, Error)]
pub enum MaskError {
    /// Float mask voxel that does not hold a whole number
    #[error("Mask voxel {index} holds non-integer label value {value}")]
    NonIntegerLabel { index: usize, value: f64 },
}
