//! Radiomic Feature Tool Run

use crate::backend::{FilteredImage, ImagingBackend};
use crate::manifest::RunManifest;
use crate::settings::ExtractionSettings;
use crate::ToolError;
use artifact_store::{ArtifactSink, OutputLayout, PendingUpload, TablePersister};
use chrono::Utc;
use feature_engine::{FeatureAggregator, FeatureGroup, ImageFilter, LabelMask};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the manifest written into the output directory
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Downloaded inputs of one run
pub struct ToolInputs<I> {
    /// Anatomical image the features are computed on
    pub image: I,
    pub mask: LabelMask,
    /// Downloaded image file, uploaded back as an input
    pub image_path: PathBuf,
    /// Downloaded mask file, uploaded back as an input
    pub mask_path: PathBuf,
    pub modality: Option<String>,
    pub mask_tags: BTreeSet<String>,
}

/// Per-label radiomic feature extraction with CSV sheets and filtered images
pub struct RadiomicsTool<B: ImagingBackend> {
    backend: B,
    settings: ExtractionSettings,
    output_dir: PathBuf,
    layout: OutputLayout,
}

impl<B: ImagingBackend> RadiomicsTool<B> {
    pub fn new(backend: B, settings: ExtractionSettings, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            settings,
            output_dir: output_dir.into(),
            layout: OutputLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the tool end to end.
    ///
    /// Everything is computed and written locally before the first upload, so
    /// a failure at any step leaves nothing on the platform.
    pub fn run<S>(&self, inputs: &ToolInputs<B::Image>, sink: &mut S) -> Result<RunManifest, ToolError>
    where
        S: ArtifactSink + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("Processing run {}", run_id);

        info!("Instantiating feature extractor");
        let mut extractor = self.backend.extractor(&self.settings)?;
        info!(
            "Enabled features: {:?}; enabled filters: {:?}",
            self.settings.feature_classes, self.settings.filters
        );

        info!("Extracting radiomic features");
        let aggregation = FeatureAggregator::new(self.settings.groups()).aggregate(
            &inputs.image,
            &inputs.mask,
            &mut extractor,
        )?;

        fs::create_dir_all(&self.output_dir)?;
        let filtered = self.render_filtered_images(inputs)?;

        let persister = TablePersister::new(&self.output_dir, self.layout.clone());
        let mut tables: BTreeMap<FeatureGroup, PendingUpload> = aggregation
            .tables
            .keys()
            .copied()
            .zip(persister.persist_all(&aggregation.tables)?)
            .collect();

        info!("Uploading results");
        let mut queue = Vec::new();
        queue.extend(tables.remove(&FeatureGroup::Original));
        queue.push(PendingUpload {
            local_path: inputs.image_path.clone(),
            spec: self.layout.anatomical_input(inputs.modality.clone()),
        });
        queue.push(PendingUpload {
            local_path: inputs.mask_path.clone(),
            spec: self.layout.labels_input(&inputs.mask_tags),
        });
        for (filter, images) in filtered {
            queue.extend(images);
            for group in filter.groups() {
                queue.extend(tables.remove(&group));
            }
        }
        queue.extend(tables.into_values());

        let mut artifacts = Vec::with_capacity(queue.len());
        for pending in queue {
            pending.upload(&mut *sink)?;
            artifacts.push(pending.spec);
        }

        let manifest = RunManifest {
            run_id,
            started_at,
            finished_at: Utc::now(),
            feature_classes: self
                .settings
                .feature_classes
                .iter()
                .map(|c| c.to_string())
                .collect(),
            filters: self.settings.filters.iter().map(|f| f.to_string()).collect(),
            groups: aggregation.tables.keys().map(|g| g.name()).collect(),
            report: aggregation.report,
            artifacts,
        };
        manifest.write(&self.output_dir.join(MANIFEST_FILE))?;
        info!("Run {} complete: {} artifacts uploaded", run_id, manifest.artifacts.len());
        Ok(manifest)
    }

    /// Generate and save every filtered image, grouped by filter
    fn render_filtered_images(
        &self,
        inputs: &ToolInputs<B::Image>,
    ) -> Result<Vec<(ImageFilter, Vec<PendingUpload>)>, ToolError> {
        let mut rendered = Vec::with_capacity(self.settings.filters.len());
        for &filter in &self.settings.filters {
            let images =
                self.backend
                    .filtered_images(&inputs.image, &inputs.mask, filter, &self.settings)?;
            let mut pending = Vec::new();
            for item in images {
                let FilteredImage { name, image } = item?;
                let spec = self.layout.filtered_image(filter, &name);
                let local_path = self.output_dir.join(&spec.file_name);
                self.backend.save_image(&image, &local_path)?;
                debug!("Saved filtered image {}", local_path.display());
                pending.push(PendingUpload { local_path, spec });
            }
            info!("{} filter produced {} images", filter, pending.len());
            rendered.push((filter, pending));
        }
        Ok(rendered)
    }
}
