//! Exports: run results to JSON, datasets to CSV.
//!
//! The JSON export is meant to be easy to consume in notebooks or downstream
//! scripts; it embeds the run configuration so the numbers can be reproduced.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::io::ingest::Dataset;

/// Envelope written by `--export`.
#[derive(Debug, Serialize)]
pub struct ExportFile<'a, C: Serialize, R: Serialize> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub dataset: &'a str,
    pub config: &'a C,
    pub result: &'a R,
}

/// Write a run result (plus its config) as pretty JSON.
pub fn write_result_json<C: Serialize, R: Serialize>(
    path: &Path,
    dataset: &Dataset,
    config: &C,
    result: &R,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let export = ExportFile {
        tool: "fairlend",
        version: env!("CARGO_PKG_VERSION"),
        generated_at: Utc::now(),
        dataset: &dataset.name,
        config,
        result,
    };

    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::runtime(format!("Failed to write export JSON: {e}")))?;

    tracing::info!(path = %path.display(), "wrote export");
    Ok(())
}

/// Write a dataset back out as CSV (header + rows).
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to create CSV '{}': {e}", path.display())))?;

    writer
        .write_record(&dataset.headers)
        .map_err(|e| AppError::runtime(format!("Failed to write CSV header: {e}")))?;
    for row in &dataset.rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::runtime(format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush CSV '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::{read_csv, read_csv_path};

    #[test]
    fn dataset_csv_round_trips_through_disk() {
        let ds = read_csv("t.csv", "g,v\n\"A, inc\",1.5\nB,\n".as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_dataset_csv(&path, &ds).unwrap();
        let back = read_csv_path(&path).unwrap();
        assert_eq!(back.headers, ds.headers);
        assert_eq!(back.rows, ds.rows);
    }

    #[test]
    fn export_json_has_envelope_fields() {
        let ds = read_csv("t.csv", "g,v\nA,1\n".as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_result_json(&path, &ds, &"cfg", &vec![1, 2, 3]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["tool"], "fairlend");
        assert_eq!(json["dataset"], "t.csv");
        assert_eq!(json["result"][2], 3);
        assert!(json["generated_at"].is_string());
    }
}
