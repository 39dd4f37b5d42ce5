//! Tool Settings
//!
//! Platform settings arrive as JSON. They can also be read from a settings
//! file and overridden through `RADIOMICS__*` environment variables.

use feature_engine::{GroupSet, ImageFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Prefix for environment overrides, e.g. `RADIOMICS__SIGMA_LOG=2.0`
pub const ENV_PREFIX: &str = "RADIOMICS";

/// Requested extraction setup the backend cannot honour
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Unknown feature class: {0}")]
    UnknownFeatureClass(String),

    #[error("Unknown image filter: {0}")]
    UnknownImageFilter(String),

    #[error("No feature class enabled")]
    NoFeatureClasses,

    #[error("Invalid value {value} for {name}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Rejected by the extraction backend itself
    #[error("Extraction backend rejected configuration: {0}")]
    Backend(String),
}

/// Radiomic feature class, named as the extraction backend names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureClass {
    FirstOrder,
    Shape,
    Shape2D,
    Glcm,
    Glrlm,
    Glszm,
    Gldm,
    Ngtdm,
}

impl FeatureClass {
    pub const ALL: [FeatureClass; 8] = [
        FeatureClass::FirstOrder,
        FeatureClass::Shape,
        FeatureClass::Shape2D,
        FeatureClass::Glcm,
        FeatureClass::Glrlm,
        FeatureClass::Glszm,
        FeatureClass::Gldm,
        FeatureClass::Ngtdm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureClass::FirstOrder => "firstorder",
            FeatureClass::Shape => "shape",
            FeatureClass::Shape2D => "shape2D",
            FeatureClass::Glcm => "glcm",
            FeatureClass::Glrlm => "glrlm",
            FeatureClass::Glszm => "glszm",
            FeatureClass::Gldm => "gldm",
            FeatureClass::Ngtdm => "ngtdm",
        }
    }
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureClass {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureClass::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownFeatureClass(s.to_string()))
    }
}

/// Settings as provided by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Feature classes to enable, e.g. `firstorder`, `glcm`
    #[serde(default)]
    pub feature_classes: Vec<String>,

    /// Image filters to enable: `Wavelet`, `LoG`, `Logarithm`, `Exponential`
    #[serde(default)]
    pub image_filters: Vec<String>,

    /// LoG kernel sigma (mm)
    #[serde(default = "default_sigma_log", alias = "sigma_LoG")]
    pub sigma_log: f64,

    /// Bin width used for LoG-filtered images
    #[serde(default = "default_bin_width_log", alias = "fwidth_LoG", alias = "fwidth_log")]
    pub bin_width_log: f64,
}

fn default_sigma_log() -> f64 {
    1.0
}

fn default_bin_width_log() -> f64 {
    25.0
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            feature_classes: Vec::new(),
            image_filters: Vec::new(),
            sigma_log: default_sigma_log(),
            bin_width_log: default_bin_width_log(),
        }
    }
}

impl ToolSettings {
    /// Load from a settings file (format chosen by extension) with
    /// `RADIOMICS__*` environment overrides
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    fn load_with_env_prefix(path: &Path, prefix: &str) -> Result<Self, config::ConfigError> {
        info!("Loading settings from {}", path.display());
        config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("feature_classes")
                    .with_list_parse_key("image_filters"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse the platform's JSON settings document
    pub fn from_json(json: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()?
            .try_deserialize()
    }

    /// Check every requested class and filter before any work starts
    pub fn validate(&self) -> Result<ExtractionSettings, ConfigurationError> {
        let mut feature_classes = Vec::new();
        for name in &self.feature_classes {
            let class: FeatureClass = name.parse()?;
            if !feature_classes.contains(&class) {
                feature_classes.push(class);
            }
        }
        if feature_classes.is_empty() {
            return Err(ConfigurationError::NoFeatureClasses);
        }

        let mut filters = Vec::new();
        for name in &self.image_filters {
            // the original image is always processed
            if name == "Original" {
                continue;
            }
            let filter: ImageFilter = name
                .parse()
                .map_err(|_| ConfigurationError::UnknownImageFilter(name.clone()))?;
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
        filters.sort();

        if filters.contains(&ImageFilter::LoG) {
            check_positive("sigma_log", self.sigma_log)?;
            check_positive("bin_width_log", self.bin_width_log)?;
        }

        Ok(ExtractionSettings {
            feature_classes,
            filters,
            log_sigma: self.sigma_log,
            log_bin_width: self.bin_width_log,
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter { name, value })
    }
}

/// Validated settings handed to the extraction backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    pub feature_classes: Vec<FeatureClass>,
    /// Enabled filters in persistence order
    pub filters: Vec<ImageFilter>,
    pub log_sigma: f64,
    pub log_bin_width: f64,
}

impl ExtractionSettings {
    /// Groups to materialize: original plus every enabled filter's groups
    pub fn groups(&self) -> GroupSet {
        GroupSet::from_filters(&self.filters)
    }
}
