//! Run Manifest

use crate::ToolError;
use artifact_store::ArtifactSpec;
use chrono::{DateTime, Utc};
use feature_engine::AggregationReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

/// Summary of one completed tool run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub feature_classes: Vec<String>,
    pub filters: Vec<String>,
    /// Enabled groups in persistence order
    pub groups: Vec<String>,
    pub report: AggregationReport,
    /// Uploaded artifacts in upload order
    pub artifacts: Vec<ArtifactSpec>,
}

impl RunManifest {
    /// Write as pretty JSON
    pub fn write(&self, path: &Path) -> Result<(), ToolError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, ToolError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
