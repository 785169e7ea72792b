//! Dataset sources: local CSV, HTTP CSV, or the built-in synthetic sample.

pub mod remote;
pub mod sample;

pub use remote::CsvClient;

use crate::domain::{Analysis, DataSource};
use crate::error::AppError;
use crate::io::ingest::{Dataset, read_csv_path};

/// Load the dataset an analysis should run on.
pub fn load_dataset(analysis: Analysis, source: &DataSource) -> Result<Dataset, AppError> {
    tracing::info!(analysis = analysis.display_name(), source = %source.describe(), "loading dataset");
    let dataset = match source {
        DataSource::File(path) => read_csv_path(path)?,
        DataSource::Url(url) => CsvClient::new()?.fetch_dataset(url)?,
        DataSource::Sample(spec) => sample::generate(analysis, spec)?,
    };

    for err in &dataset.row_errors {
        tracing::warn!(line = err.line, "{}", err.message);
    }
    Ok(dataset)
}
