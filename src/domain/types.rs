//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the pipeline and both front-ends (CLI, TUI)
//! - exported to JSON
//! - asserted on directly in tests

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Inferred type of a dataset column.
///
/// A column is `Numeric` when every non-missing cell parses as a finite number
/// (and at least one cell is present). Everything else is `Categorical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Which of the two canned analyses a dataset feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Analysis {
    /// Price testing (ANOVA on a rate/APR column).
    Pricing,
    /// Credit decision testing (chi-square on approvals).
    Underwriting,
}

impl Analysis {
    pub fn display_name(self) -> &'static str {
        match self {
            Analysis::Pricing => "Price Testing",
            Analysis::Underwriting => "Credit Decision Testing",
        }
    }

    /// File name used when writing the built-in sample to disk.
    pub fn sample_file_name(self) -> &'static str {
        match self {
            Analysis::Pricing => "Pricing_data.csv",
            Analysis::Underwriting => "UW_data.csv",
        }
    }

    /// Environment variable holding the default dataset URL.
    pub fn url_env_var(self) -> &'static str {
        match self {
            Analysis::Pricing => "FAIRLEND_PRICING_URL",
            Analysis::Underwriting => "FAIRLEND_UW_URL",
        }
    }
}

/// Parameters for the seeded synthetic dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub seed: u64,
    pub rows: usize,
    /// Group effect injected into the disadvantaged segment.
    ///
    /// Pricing: added to the rate (percentage points).
    /// Underwriting: subtracted from the approval probability.
    pub gap: f64,
}

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum DataSource {
    File(PathBuf),
    Url(String),
    Sample(SampleSpec),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => format!("file {}", path.display()),
            DataSource::Url(url) => format!("url {url}"),
            DataSource::Sample(spec) => format!("sample (seed={}, n={})", spec.seed, spec.rows),
        }
    }
}

/// Terminal output settings shared by both analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rows shown in the data preview.
    pub preview_rows: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Significance threshold used for the verdict line.
    pub alpha: f64,
    pub export: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            plot: true,
            plot_width: 72,
            plot_height: 16,
            alpha: 0.05,
            export: None,
        }
    }
}

/// A price-testing run as understood by the pipeline.
///
/// Column names left as `None` are resolved against the dataset
/// (first categorical / first numeric column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    pub source: DataSource,
    pub group_column: Option<String>,
    pub value_column: Option<String>,
    pub output: OutputConfig,
}

/// A credit-decision run as understood by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditConfig {
    pub source: DataSource,
    pub group_column: Option<String>,
    pub outcome_column: Option<String>,
    pub output: OutputConfig,
}

/// Box-plot statistics for one group of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1`); `None` for a single observation.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One row of an ANOVA summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaRow {
    pub source: String,
    pub df: f64,
    pub sum_sq: f64,
    pub mean_sq: f64,
    /// Only set on the factor row.
    pub f_stat: Option<f64>,
    /// `PR(>F)`; only set on the factor row.
    pub p_value: Option<f64>,
}

/// One-way ANOVA summary: factor row + residual row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    pub factor: AnovaRow,
    pub residual: AnovaRow,
    pub n_obs: usize,
    pub n_groups: usize,
}

impl AnovaTable {
    pub fn f_stat(&self) -> f64 {
        self.factor.f_stat.unwrap_or(f64::NAN)
    }

    pub fn p_value(&self) -> f64 {
        self.factor.p_value.unwrap_or(f64::NAN)
    }
}

/// Cross-tabulation of segment (rows) against outcome (columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contingency {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl Contingency {
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.col_labels.len()];
        for row in &self.counts {
            for (j, &c) in row.iter().enumerate() {
                totals[j] += c;
            }
        }
        totals
    }
}

/// Per-segment outcome proportions (normalized value counts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRates {
    pub groups: Vec<String>,
    pub outcomes: Vec<String>,
    /// `rates[i][j]` = share of segment `i` with outcome `j`.
    pub rates: Vec<Vec<f64>>,
}

/// Result of a chi-square test of independence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    pub expected: Vec<Vec<f64>>,
    /// Whether Yates' continuity correction was applied (2x2 tables).
    pub yates_corrected: bool,
}

/// Verdict for a p-value at a given threshold.
pub fn is_significant(p_value: f64, alpha: f64) -> bool {
    p_value.is_finite() && p_value < alpha
}
