//! Feature Groups and Image Filters

use crate::error::UnknownFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Wavelet sub-band, named by its high/low pass code per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubBand {
    HHH,
    HHL,
    HLH,
    HLL,
    LHH,
    LHL,
    LLH,
    LLL,
}

impl SubBand {
    /// All sub-bands in declared order
    pub const ALL: [SubBand; 8] = [
        SubBand::HHH,
        SubBand::HHL,
        SubBand::HLH,
        SubBand::HLL,
        SubBand::LHH,
        SubBand::LHL,
        SubBand::LLH,
        SubBand::LLL,
    ];

    /// Three-letter code as it appears in feature names
    pub fn code(&self) -> &'static str {
        match self {
            SubBand::HHH => "HHH",
            SubBand::HHL => "HHL",
            SubBand::HLH => "HLH",
            SubBand::HLL => "HLL",
            SubBand::LHH => "LHH",
            SubBand::LHL => "LHL",
            SubBand::LLH => "LLH",
            SubBand::LLL => "LLL",
        }
    }
}

/// Bucket of features sharing an image-transform origin.
///
/// The derived ordering is the persistence order: original, wavelet
/// sub-bands, LoG, Logarithm, Exponential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureGroup {
    Original,
    Wavelet(SubBand),
    LoG,
    Logarithm,
    Exponential,
}

impl FeatureGroup {
    /// Every group in persistence order
    pub fn all() -> Vec<FeatureGroup> {
        let mut groups = vec![FeatureGroup::Original];
        groups.extend(SubBand::ALL.iter().map(|&b| FeatureGroup::Wavelet(b)));
        groups.extend([
            FeatureGroup::LoG,
            FeatureGroup::Logarithm,
            FeatureGroup::Exponential,
        ]);
        groups
    }

    /// Stable identifier
    pub fn name(&self) -> String {
        match self {
            FeatureGroup::Original => "original".to_string(),
            FeatureGroup::Wavelet(band) => format!("wavelet-{}", band.code()),
            FeatureGroup::LoG => "LoG".to_string(),
            FeatureGroup::Logarithm => "logarithm".to_string(),
            FeatureGroup::Exponential => "exponential".to_string(),
        }
    }

    /// Filter that produces this group, `None` for the original image
    pub fn filter(&self) -> Option<ImageFilter> {
        match self {
            FeatureGroup::Original => None,
            FeatureGroup::Wavelet(_) => Some(ImageFilter::Wavelet),
            FeatureGroup::LoG => Some(ImageFilter::LoG),
            FeatureGroup::Logarithm => Some(ImageFilter::Logarithm),
            FeatureGroup::Exponential => Some(ImageFilter::Exponential),
        }
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Derived-image family applied before extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImageFilter {
    Wavelet,
    LoG,
    Logarithm,
    Exponential,
}

impl ImageFilter {
    /// All filters in persistence order
    pub const ALL: [ImageFilter; 4] = [
        ImageFilter::Wavelet,
        ImageFilter::LoG,
        ImageFilter::Logarithm,
        ImageFilter::Exponential,
    ];

    /// Name used by the platform settings and the extraction backend
    pub fn name(&self) -> &'static str {
        match self {
            ImageFilter::Wavelet => "Wavelet",
            ImageFilter::LoG => "LoG",
            ImageFilter::Logarithm => "Logarithm",
            ImageFilter::Exponential => "Exponential",
        }
    }

    /// Groups this filter's features land in
    pub fn groups(&self) -> Vec<FeatureGroup> {
        match self {
            ImageFilter::Wavelet => SubBand::ALL.iter().map(|&b| FeatureGroup::Wavelet(b)).collect(),
            ImageFilter::LoG => vec![FeatureGroup::LoG],
            ImageFilter::Logarithm => vec![FeatureGroup::Logarithm],
            ImageFilter::Exponential => vec![FeatureGroup::Exponential],
        }
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFilter::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Ordered set of groups to materialize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSet {
    groups: BTreeSet<FeatureGroup>,
}

impl GroupSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the original-image group
    pub fn original_only() -> Self {
        let mut set = Self::new();
        set.insert(FeatureGroup::Original);
        set
    }

    /// Original group plus every group of the enabled filters
    pub fn from_filters<'a>(filters: impl IntoIterator<Item = &'a ImageFilter>) -> Self {
        let mut set = Self::original_only();
        for filter in filters {
            for group in filter.groups() {
                set.insert(group);
            }
        }
        set
    }

    /// Add a group; returns false when it was already present
    pub fn insert(&mut self, group: FeatureGroup) -> bool {
        self.groups.insert(group)
    }

    pub fn contains(&self, group: FeatureGroup) -> bool {
        self.groups.contains(&group)
    }

    /// Groups in persistence order
    pub fn iter(&self) -> impl Iterator<Item = FeatureGroup> + '_ {
        self.groups.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<FeatureGroup> for GroupSet {
    fn from_iter<T: IntoIterator<Item = FeatureGroup>>(iter: T) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_order_matches_persistence_order() {
        let names: Vec<String> = FeatureGroup::all().iter().map(|g| g.name()).collect();
        assert_eq!(
            names,
            vec![
                "original",
                "wavelet-HHH",
                "wavelet-HHL",
                "wavelet-HLH",
                "wavelet-HLL",
                "wavelet-LHH",
                "wavelet-LHL",
                "wavelet-LLH",
                "wavelet-LLL",
                "LoG",
                "logarithm",
                "exponential",
            ]
        );

        let mut shuffled = FeatureGroup::all();
        shuffled.reverse();
        shuffled.sort();
        assert_eq!(shuffled, FeatureGroup::all());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("Wavelet".parse::<ImageFilter>(), Ok(ImageFilter::Wavelet));
        assert_eq!("LoG".parse::<ImageFilter>(), Ok(ImageFilter::LoG));
        assert_eq!(
            "Square".parse::<ImageFilter>(),
            Err(UnknownFilter("Square".to_string()))
        );
        // Names are case sensitive, as the backend's are
        assert!("log".parse::<ImageFilter>().is_err());
    }

    #[test]
    fn test_group_set_from_filters() {
        let set = GroupSet::from_filters(&[ImageFilter::Exponential, ImageFilter::Wavelet]);
        assert_eq!(set.len(), 10);
        assert!(set.contains(FeatureGroup::Original));
        assert!(set.contains(FeatureGroup::Wavelet(SubBand::LLH)));
        assert!(!set.contains(FeatureGroup::LoG));

        let order: Vec<FeatureGroup> = set.iter().collect();
        assert_eq!(order.first(), Some(&FeatureGroup::Original));
        assert_eq!(order.last(), Some(&FeatureGroup::Exponential));
    }

    #[test]
    fn test_filter_of_group() {
        assert_eq!(FeatureGroup::Original.filter(), None);
        assert_eq!(
            FeatureGroup::Wavelet(SubBand::HLH).filter(),
            Some(ImageFilter::Wavelet)
        );
        for filter in ImageFilter::ALL {
            assert!(filter.groups().iter().all(|g| g.filter() == Some(filter)));
        }
    }
}
