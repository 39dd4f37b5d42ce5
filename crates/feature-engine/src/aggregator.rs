//! Label-Keyed Feature Aggregation

use crate::classify::ClassificationPolicy;
use crate::error::AggregationError;
use crate::extractor::{FeatureExtractor, FeatureValue};
use crate::group::{FeatureGroup, GroupSet};
use crate::table::FeatureTable;
use label_mask::{Label, LabelMask};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Counters describing one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Labels processed, ascending
    pub labels: Vec<Label>,
    /// Features placed into an enabled group's table
    pub classified: usize,
    /// Features no rule matched
    pub dropped_unmatched: usize,
    /// Features whose group is not enabled
    pub dropped_disabled: usize,
}

/// Result of a successful run: one table per enabled group
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub tables: BTreeMap<FeatureGroup, FeatureTable>,
    pub report: AggregationReport,
}

impl Aggregation {
    pub fn table(&self, group: FeatureGroup) -> Option<&FeatureTable> {
        self.tables.get(&group)
    }
}

/// Builds per-group feature tables from a multi-label mask
#[derive(Debug, Clone)]
pub struct FeatureAggregator {
    groups: GroupSet,
    policy: ClassificationPolicy,
}

impl FeatureAggregator {
    /// Aggregator for `groups` using the standard classification policy
    pub fn new(groups: GroupSet) -> Self {
        Self::with_policy(groups, ClassificationPolicy::standard())
    }

    pub fn with_policy(groups: GroupSet, policy: ClassificationPolicy) -> Self {
        Self { groups, policy }
    }

    /// Run the extractor once per label, in ascending label order, and collect
    /// the classified features into one table per enabled group.
    ///
    /// Any extractor error aborts the run and no table is returned.
    pub fn aggregate<I, E>(
        &self,
        image: &I,
        mask: &LabelMask,
        extractor: &mut E,
    ) -> Result<Aggregation, AggregationError>
    where
        I: ?Sized,
        E: FeatureExtractor<I> + ?Sized,
    {
        let labels = mask.labels();
        info!(
            "Aggregating {} labels into {} feature groups",
            labels.len(),
            self.groups.len()
        );

        let mut tables: BTreeMap<FeatureGroup, FeatureTable> = self
            .groups
            .iter()
            .map(|g| (g, FeatureTable::new(g)))
            .collect();
        let mut report = AggregationReport::default();

        for &label in &labels {
            let submask = mask.binary_submask(label);
            let features = extractor
                .extract(image, &submask)
                .map_err(|source| AggregationError::ExtractionFailure { label, source })?;
            debug!("Label {}: {} features extracted", label, features.len());

            let mut buckets: BTreeMap<FeatureGroup, Vec<(String, FeatureValue)>> = BTreeMap::new();
            for (name, value) in features {
                match self.policy.classify(&name) {
                    Some(group) if self.groups.contains(group) => {
                        buckets.entry(group).or_default().push((name, value));
                        report.classified += 1;
                    }
                    Some(group) => {
                        debug!("Dropping {} (group {} not enabled)", name, group);
                        report.dropped_disabled += 1;
                    }
                    None => {
                        debug!("Dropping unclassified feature {}", name);
                        report.dropped_unmatched += 1;
                    }
                }
            }

            for (group, table) in tables.iter_mut() {
                table.push_column(label, buckets.remove(group).unwrap_or_default());
            }
            metrics::counter!("feature_engine_labels_processed_total").increment(1);
        }

        if report.dropped_unmatched > 0 {
            warn!(
                "{} feature names matched no group and were dropped",
                report.dropped_unmatched
            );
            metrics::counter!("feature_engine_features_dropped_total")
                .increment(report.dropped_unmatched as u64);
        }

        report.labels = labels;
        info!(
            "Aggregation complete: {} features classified, {} unmatched, {} disabled",
            report.classified, report.dropped_unmatched, report.dropped_disabled
        );
        Ok(Aggregation { tables, report })
    }
}
