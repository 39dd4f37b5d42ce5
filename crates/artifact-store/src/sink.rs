//! Upload Sinks

use crate::layout::ArtifactSpec;
use crate::StoreError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Destination that accepts finished artifacts
pub trait ArtifactSink {
    /// Upload the file at `local_path` to `spec.destination`
    fn upload(&mut self, local_path: &Path, spec: &ArtifactSpec) -> Result<(), StoreError>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &mut S {
    fn upload(&mut self, local_path: &Path, spec: &ArtifactSpec) -> Result<(), StoreError> {
        (**self).upload(local_path, spec)
    }
}

/// Sink that copies artifacts under a root directory, mirroring destinations
pub struct LocalDirectorySink {
    root: PathBuf,
    uploaded: Vec<ArtifactSpec>,
}

impl LocalDirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("Uploading artifacts to local directory {}", root.display());
        Self {
            root,
            uploaded: Vec::new(),
        }
    }

    /// Artifacts uploaded so far, in upload order
    pub fn uploaded(&self) -> &[ArtifactSpec] {
        &self.uploaded
    }

    fn target_path(&self, destination: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(destination);
        let escapes = relative.components().any(|c| !matches!(c, Component::Normal(_)));
        if destination.is_empty() || escapes {
            return Err(StoreError::Upload {
                destination: destination.to_string(),
                reason: "destination must be a relative path inside the sink".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl ArtifactSink for LocalDirectorySink {
    fn upload(&mut self, local_path: &Path, spec: &ArtifactSpec) -> Result<(), StoreError> {
        let target = self.target_path(&spec.destination)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local_path, &target).map_err(|e| StoreError::Upload {
            destination: spec.destination.clone(),
            reason: e.to_string(),
        })?;
        debug!("Uploaded {} -> {}", local_path.display(), target.display());
        self.uploaded.push(spec.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::OutputLayout;
    use feature_engine::FeatureGroup;
    use tempfile::TempDir;

    #[test]
    fn test_copies_into_destination_tree() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let local = src.path().join("LoG_radiomic_features.csv");
        fs::write(&local, ",label1\n").unwrap();

        let spec = OutputLayout::default().table(FeatureGroup::LoG);
        let mut sink = LocalDirectorySink::new(dst.path());
        sink.upload(&local, &spec).unwrap();

        let copied = fs::read_to_string(dst.path().join("LoG/LoG_radiomic_features.csv")).unwrap();
        assert_eq!(copied, ",label1\n");
        assert_eq!(sink.uploaded(), &[spec]);
    }

    #[test]
    fn test_rejects_escaping_destination() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let local = src.path().join("a.csv");
        fs::write(&local, "x").unwrap();

        let mut spec = OutputLayout::default().table(FeatureGroup::Original);
        spec.destination = "../outside.csv".to_string();
        let mut sink = LocalDirectorySink::new(dst.path());

        assert!(matches!(
            sink.upload(&local, &spec),
            Err(StoreError::Upload { .. })
        ));
        assert!(sink.uploaded().is_empty());
    }

    #[test]
    fn test_missing_source_is_upload_error() {
        let dst = TempDir::new().unwrap();
        let spec = OutputLayout::default().table(FeatureGroup::Original);
        let mut sink = LocalDirectorySink::new(dst.path());
        let result = sink.upload(Path::new("/nonexistent/file.csv"), &spec);
        assert!(matches!(result, Err(StoreError::Upload { .. })));
    }
}
