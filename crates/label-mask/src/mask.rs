//! Label Mask Implementation

use crate::{Label, MaskError, BACKGROUND};
use ndarray::{ArrayD, ArrayViewD};
use std::collections::BTreeSet;
use tracing::debug;

/// Read-only multi-label mask
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMask {
    data: ArrayD<Label>,
}

impl LabelMask {
    /// Wrap an integer label array
    pub fn new(data: ArrayD<Label>) -> Self {
        Self { data }
    }

    /// Convert a float mask, as most NIfTI readers return one.
    ///
    /// Every voxel must hold a finite whole number.
    pub fn from_float(data: ArrayD<f64>) -> Result<Self, MaskError> {
        for (index, &value) in data.iter().enumerate() {
            // `Label::MAX as f64` rounds up to 2^63, which does not fit
            let in_range = value >= Label::MIN as f64 && value < Label::MAX as f64;
            if !value.is_finite() || value.fract() != 0.0 || !in_range {
                return Err(MaskError::NonIntegerLabel { index, value });
            }
        }
        Ok(Self::new(data.mapv(|v| v as Label)))
    }

    /// Shape of the underlying array
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Borrow the raw label array
    pub fn view(&self) -> ArrayViewD<'_, Label> {
        self.data.view()
    }

    /// Sorted distinct nonzero labels
    pub fn labels(&self) -> Vec<Label> {
        let labels: BTreeSet<Label> = self
            .data
            .iter()
            .copied()
            .filter(|&v| v != BACKGROUND)
            .collect();
        debug!("Mask {:?} holds {} labels", self.shape(), labels.len());
        labels.into_iter().collect()
    }

    /// Binary mask: 1 where the voxel equals `label`, 0 elsewhere
    pub fn binary_submask(&self, label: Label) -> ArrayD<u8> {
        self.data.mapv(|v| u8::from(v == label))
    }

    /// Number of voxels carrying `label`
    pub fn voxel_count(&self, label: Label) -> usize {
        self.data.iter().filter(|&&v| v == label).count()
    }

    /// Whether the mask has no foreground voxel at all
    pub fn is_background_only(&self) -> bool {
        self.data.iter().all(|&v| v == BACKGROUND)
    }
}

impl From<ArrayD<Label>> for LabelMask {
    fn from(data: ArrayD<Label>) -> Self {
        Self::new(data)
    }
}
