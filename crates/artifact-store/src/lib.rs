//! Artifact Store
//!
//! Serializes feature tables to CSV, names every output artifact, and hands
//! finished files to an upload sink.

mod csv_writer;
mod layout;
mod persister;
mod sink;

pub use csv_writer::{table_to_csv, write_table};
pub use layout::{ArtifactSpec, OutputLayout};
pub use persister::{PendingUpload, TablePersister};
pub use sink::{ArtifactSink, LocalDirectorySink};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Upload of {destination} failed: {reason}")]
    Upload { destination: String, reason: String },
}
