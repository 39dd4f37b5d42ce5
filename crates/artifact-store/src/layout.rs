//! Output Naming

use feature_engine::{FeatureGroup, ImageFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where an artifact is written locally and where it is uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// File name inside the local output directory
    pub file_name: String,
    /// Destination path on the platform
    pub destination: String,
    pub tags: BTreeSet<String>,
    /// Imaging modality, only set for image inputs
    pub modality: Option<String>,
}

impl ArtifactSpec {
    fn new(file_name: String, destination: String, tags: &[&str]) -> Self {
        Self {
            file_name,
            destination,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            modality: None,
        }
    }
}

/// Naming scheme for every artifact a tool run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Extension of saved images, without the leading dot
    pub image_extension: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            image_extension: "nii.gz".to_string(),
        }
    }
}

impl OutputLayout {
    /// Folder holding a filter family's artifacts
    pub fn family_folder(filter: ImageFilter) -> &'static str {
        filter.name()
    }

    /// Tag attached to a filter family's artifacts
    pub fn family_tag(filter: ImageFilter) -> &'static str {
        match filter {
            ImageFilter::Wavelet => "wavelet",
            ImageFilter::LoG => "LoG",
            ImageFilter::Logarithm => "logarithm",
            ImageFilter::Exponential => "exponential",
        }
    }

    /// CSV holding one group's feature table
    pub fn table(&self, group: FeatureGroup) -> ArtifactSpec {
        let stem = match group {
            FeatureGroup::Original => "original".to_string(),
            FeatureGroup::Wavelet(band) => format!("wavelet_{}", band.code()),
            FeatureGroup::LoG => "LoG".to_string(),
            FeatureGroup::Logarithm => "logarithm".to_string(),
            FeatureGroup::Exponential => "exponential".to_string(),
        };
        let file_name = format!("{}_radiomic_features.csv", stem);

        match group.filter() {
            None => ArtifactSpec::new(file_name.clone(), file_name, &["csv"]),
            Some(filter) => {
                let destination = format!("{}/{}", Self::family_folder(filter), file_name);
                ArtifactSpec::new(file_name, destination, &[Self::family_tag(filter), "csv"])
            }
        }
    }

    /// Derived image produced by `filter`, named by the backend
    pub fn filtered_image(&self, filter: ImageFilter, name: &str) -> ArtifactSpec {
        let file_name = format!("{}_filtered_image.{}", name, self.image_extension);
        let destination = format!("{}/{}", Self::family_folder(filter), file_name);
        ArtifactSpec::new(file_name, destination, &[Self::family_tag(filter)])
    }

    /// The anatomical image the features were computed on
    pub fn anatomical_input(&self, modality: Option<String>) -> ArtifactSpec {
        let file_name = format!("anatomical_image.{}", self.image_extension);
        let mut spec = ArtifactSpec::new(file_name.clone(), format!("inputs/{}", file_name), &[]);
        spec.modality = modality;
        spec
    }

    /// The label mask, re-uploaded with its original tags
    pub fn labels_input(&self, tags: &BTreeSet<String>) -> ArtifactSpec {
        let file_name = format!("labels_mask.{}", self.image_extension);
        let mut spec = ArtifactSpec::new(file_name.clone(), format!("inputs/{}", file_name), &[]);
        spec.tags = tags.clone();
        spec
    }
}
