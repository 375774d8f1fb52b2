//! Read compact dataset files and write expanded dataset snapshots.
//!
//! A snapshot is the expanded `Dataset` plus a little metadata, so an export
//! can be inspected without re-running the decoder.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{CompactDataset, decode};
use crate::domain::Dataset;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetSnapshot<'a> {
    tool: &'static str,
    exported_at: DateTime<Utc>,
    source: &'a str,
    dataset: &'a Dataset,
}

/// Read a compact payload from disk.
pub fn read_compact_json(path: &Path) -> Result<CompactDataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open dataset '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::data(format!("Invalid dataset '{}': {e}", path.display())))
}

/// Read and expand a compact payload from disk.
pub fn load_dataset_file(path: &Path) -> Result<Dataset, AppError> {
    let compact = read_compact_json(path)?;
    Ok(decode(&compact))
}

/// Write the expanded dataset as pretty JSON.
pub fn write_dataset_json(path: &Path, dataset: &Dataset, source: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create dataset JSON '{}': {e}", path.display())))?;

    let snapshot = DatasetSnapshot {
        tool: "mkt",
        exported_at: Utc::now(),
        source,
        dataset,
    };

    serde_json::to_writer_pretty(file, &snapshot)
        .map_err(|e| AppError::usage(format!("Failed to write dataset JSON: {e}")))?;

    Ok(())
}
