//! Table Persistence

use crate::csv_writer::write_table;
use crate::layout::{ArtifactSpec, OutputLayout};
use crate::sink::ArtifactSink;
use crate::StoreError;
use feature_engine::{FeatureGroup, FeatureTable};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{debug, info};

/// File written locally and waiting to be uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub local_path: PathBuf,
    pub spec: ArtifactSpec,
}

impl PendingUpload {
    pub fn upload<S: ArtifactSink + ?Sized>(&self, sink: &mut S) -> Result<(), StoreError> {
        sink.upload(&self.local_path, &self.spec)
    }
}

/// Writes feature tables as CSV files into an output directory
pub struct TablePersister {
    output_dir: PathBuf,
    layout: OutputLayout,
}

impl TablePersister {
    pub fn new(output_dir: impl Into<PathBuf>, layout: OutputLayout) -> Self {
        Self {
            output_dir: output_dir.into(),
            layout,
        }
    }

    /// Write one table; the upload is left to the caller
    pub fn write(&self, table: &FeatureTable) -> Result<PendingUpload, StoreError> {
        fs::create_dir_all(&self.output_dir)?;
        let spec = self.layout.table(table.group());
        let local_path = self.output_dir.join(&spec.file_name);

        let file = File::create(&local_path)?;
        write_table(table, file)?;
        debug!(
            "Wrote {} ({} rows x {} labels)",
            local_path.display(),
            table.num_rows(),
            table.num_columns()
        );
        Ok(PendingUpload { local_path, spec })
    }

    /// Write every table in group order
    pub fn persist_all(
        &self,
        tables: &BTreeMap<FeatureGroup, FeatureTable>,
    ) -> Result<Vec<PendingUpload>, StoreError> {
        let pending = tables
            .values()
            .map(|table| self.write(table))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Wrote {} feature tables to {}",
            pending.len(),
            self.output_dir.display()
        );
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_writer::table_to_csv;
    use crate::sink::LocalDirectorySink;
    use feature_engine::{
        from_fn, ExtractionError, FeatureAggregator, FeatureMap, GroupSet, ImageFilter,
        LabelMask, SubBand,
    };
    use ndarray::{ArrayD, IxDyn};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn aggregate(labels: Vec<i64>) -> BTreeMap<FeatureGroup, FeatureTable> {
        let n = labels.len();
        let mask = LabelMask::new(ArrayD::from_shape_vec(IxDyn(&[n]), labels).unwrap());
        let mut extractor = from_fn(|_: &(), submask: &ArrayD<u8>| -> Result<FeatureMap, ExtractionError> {
            let voxels = submask.iter().filter(|&&v| v == 1).count() as f64;
            Ok(FeatureMap::from_iter([
                ("original_shape_VoxelVolume", voxels),
                ("wavelet-HHL_firstorder_Energy", voxels / 4.0),
                ("exponential_firstorder_Mean", voxels * 1.5),
            ]))
        });
        let groups = GroupSet::from_filters(&[ImageFilter::Wavelet, ImageFilter::Exponential]);
        FeatureAggregator::new(groups)
            .aggregate(&(), &mask, &mut extractor)
            .unwrap()
            .tables
    }

    #[test]
    fn test_persist_all_in_group_order() {
        let dir = TempDir::new().unwrap();
        let persister = TablePersister::new(dir.path(), OutputLayout::default());
        let tables = aggregate(vec![2, 1, 1, 0]);

        let pending = persister.persist_all(&tables).unwrap();
        let destinations: Vec<&str> = pending.iter().map(|p| p.spec.destination.as_str()).collect();
        assert_eq!(destinations.len(), 10);
        assert_eq!(destinations[0], "original_radiomic_features.csv");
        assert_eq!(destinations[1], "Wavelet/wavelet_HHH_radiomic_features.csv");
        assert_eq!(destinations[8], "Wavelet/wavelet_LLL_radiomic_features.csv");
        assert_eq!(destinations[9], "Exponential/exponential_radiomic_features.csv");

        let hhl = fs::read_to_string(dir.path().join("wavelet_HHL_radiomic_features.csv")).unwrap();
        assert_eq!(hhl, ",label1,label2\nwavelet-HHL_firstorder_Energy,0.5,0.25\n");
        assert_eq!(
            hhl,
            table_to_csv(&tables[&FeatureGroup::Wavelet(SubBand::HHL)]).unwrap()
        );
    }

    #[test]
    fn test_pending_upload_goes_to_sink() {
        let out = TempDir::new().unwrap();
        let platform = TempDir::new().unwrap();
        let persister = TablePersister::new(out.path().join("nested"), OutputLayout::default());
        let tables = aggregate(vec![1]);

        let pending = persister.write(&tables[&FeatureGroup::Original]).unwrap();
        let mut sink = LocalDirectorySink::new(platform.path());
        pending.upload(&mut sink).unwrap();

        let uploaded =
            fs::read_to_string(platform.path().join("original_radiomic_features.csv")).unwrap();
        assert_eq!(uploaded, ",label1\noriginal_shape_VoxelVolume,1.0\n");
    }

    proptest! {
        #[test]
        fn prop_serialized_tables_are_reproducible(labels in prop::collection::vec(0i64..8, 1..48)) {
            let first = aggregate(labels.clone());
            let second = aggregate(labels);
            for (group, table) in &first {
                prop_assert_eq!(
                    table_to_csv(table).unwrap(),
                    table_to_csv(&second[group]).unwrap()
                );
            }
        }
    }
}
