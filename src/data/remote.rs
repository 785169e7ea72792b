//! HTTP dataset loading.
//!
//! Datasets published as raw CSV (e.g. a `raw.githubusercontent.com` link) are
//! fetched with a blocking client and handed to the regular CSV ingest.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;
use crate::io::ingest::{Dataset, read_csv};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CsvClient {
    client: Client,
}

impl CsvClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download a CSV and parse it into a `Dataset`.
    pub fn fetch_dataset(&self, url: &str) -> Result<Dataset, AppError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::usage(format!("Not an http(s) URL: {url}")));
        }

        tracing::info!(url, "fetching dataset");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::runtime(format!("Request for {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Request for {url} failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::runtime(format!("Failed to read response body from {url}: {e}")))?;

        read_csv(dataset_name(url), body.as_ref())
    }
}

/// Last path segment of the URL, without query string.
fn dataset_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("remote.csv")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_name_uses_last_segment() {
        assert_eq!(
            dataset_name("https://raw.githubusercontent.com/u/r/main/Pricing_data.csv?token=x"),
            "Pricing_data.csv"
        );
        assert_eq!(dataset_name("https://example.org/"), "example.org");
    }

    #[test]
    fn non_http_urls_are_rejected_before_any_request() {
        let client = CsvClient::new().unwrap();
        let err = client.fetch_dataset("ftp://example.org/a.csv").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
