//! Feature Name Classification

use crate::group::{FeatureGroup, SubBand};

/// Substring rule: a name containing `needle` belongs to `group`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub needle: String,
    pub group: FeatureGroup,
}

impl Rule {
    pub fn new(needle: impl Into<String>, group: FeatureGroup) -> Self {
        Self {
            needle: needle.into(),
            group,
        }
    }

    fn matches(&self, name: &str) -> bool {
        name.contains(self.needle.as_str())
    }
}

/// Ordered rule list, evaluated first match wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
    rules: Vec<Rule>,
}

impl ClassificationPolicy {
    /// Policy matching the backend's feature naming.
    ///
    /// Explicit markers come first, wavelet sub-band codes after them.
    pub fn standard() -> Self {
        let mut rules = vec![
            Rule::new("original", FeatureGroup::Original),
            Rule::new("sigma", FeatureGroup::LoG),
            Rule::new("logarithm", FeatureGroup::Logarithm),
            Rule::new("exponential", FeatureGroup::Exponential),
        ];
        rules.extend(
            SubBand::ALL
                .iter()
                .map(|&band| Rule::new(band.code(), FeatureGroup::Wavelet(band))),
        );
        Self { rules }
    }

    /// Policy with no rules; every name is unclassified
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Group of the first matching rule
    pub fn classify(&self, name: &str) -> Option<FeatureGroup> {
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| rule.group)
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_backend_feature_names() {
        let policy = ClassificationPolicy::standard();
        let cases = [
            ("original_firstorder_Mean", Some(FeatureGroup::Original)),
            ("diagnostics_Image-original_Hash", Some(FeatureGroup::Original)),
            ("log-sigma-1-0-mm-3D_glcm_Contrast", Some(FeatureGroup::LoG)),
            ("logarithm_firstorder_Energy", Some(FeatureGroup::Logarithm)),
            ("exponential_glrlm_RunEntropy", Some(FeatureGroup::Exponential)),
            ("wavelet-LLH_firstorder_Mean", Some(FeatureGroup::Wavelet(SubBand::LLH))),
            ("wavelet-HLH_gldm_DependenceEntropy", Some(FeatureGroup::Wavelet(SubBand::HLH))),
            ("diagnostics_Versions_PyRadiomics", None),
            ("square_firstorder_Mean", None),
        ];
        for (name, expected) in cases {
            assert_eq!(policy.classify(name), expected, "classifying {}", name);
        }
    }

    #[test]
    fn test_explicit_markers_beat_wavelet_codes() {
        let policy = ClassificationPolicy::standard();
        assert_eq!(
            policy.classify("original_HHH_shape"),
            Some(FeatureGroup::Original)
        );
        assert_eq!(
            policy.classify("exponential_LLL_x"),
            Some(FeatureGroup::Exponential)
        );
    }

    #[test]
    fn test_wavelet_codes_in_declared_order() {
        let policy = ClassificationPolicy::standard();
        // "HHHL" contains both HHH and HHL; HHH is declared first
        assert_eq!(
            policy.classify("wavelet-HHHL_x"),
            Some(FeatureGroup::Wavelet(SubBand::HHH))
        );
    }

    #[test]
    fn test_custom_rule_has_lowest_priority() {
        let policy = ClassificationPolicy::standard()
            .with_rule(Rule::new("square", FeatureGroup::Exponential));
        assert_eq!(
            policy.classify("square_firstorder_Mean"),
            Some(FeatureGroup::Exponential)
        );
        assert_eq!(policy.rules().len(), 13);
        assert_eq!(ClassificationPolicy::empty().classify("original_x"), None);
    }

    proptest! {
        #[test]
        fn prop_result_is_first_matching_rule(name in "[a-zA-Z_-]{0,24}") {
            let policy = ClassificationPolicy::standard();
            let first = policy.rules().iter().find(|r| name.contains(r.needle.as_str()));
            prop_assert_eq!(policy.classify(&name), first.map(|r| r.group));
        }

        #[test]
        fn prop_known_prefixes_are_classified(suffix in "_[b-z]{1,8}_[b-z]{1,12}") {
            let policy = ClassificationPolicy::standard();
            let original = format!("original{}", suffix);
            prop_assert_eq!(policy.classify(&original), Some(FeatureGroup::Original));
            for band in SubBand::ALL {
                let name = format!("wavelet-{}{}", band.code(), suffix);
                let group = policy.classify(&name);
                // every explicit marker contains an 'a'; wavelet codes are uppercase
                prop_assert_eq!(group, Some(FeatureGroup::Wavelet(band)));
            }
        }
    }
}
