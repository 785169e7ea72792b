//! Shared analysis pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load dataset -> resolve columns -> clean rows -> aggregate -> test
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use serde::Serialize;

use crate::data::load_dataset;
use crate::domain::{
    Analysis, AnovaTable, ApprovalRates, ChiSquareResult, ColumnKind, Contingency, CreditConfig,
    GroupSummary, PriceConfig,
};
use crate::error::AppError;
use crate::io::ingest::Dataset;
use crate::stats::{Groups, approval_rates, chi2_contingency, crosstab, group_summaries, one_way_anova};

/// All computed outputs of a price test.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRun {
    pub group_column: String,
    pub value_column: String,
    pub rows_used: usize,
    /// Rows dropped because the group or value cell was missing.
    pub rows_dropped: usize,
    pub summaries: Vec<GroupSummary>,
    /// `None` when the ANOVA could not be computed; see `anova_error`.
    pub anova: Option<AnovaTable>,
    /// Why the ANOVA failed. The summaries are still valid.
    pub anova_error: Option<String>,
}

impl PriceRun {
    /// ANOVA p-value, NaN when the test failed.
    pub fn p_value(&self) -> f64 {
        self.anova.as_ref().map_or(f64::NAN, AnovaTable::p_value)
    }
}

/// All computed outputs of a credit decision test.
#[derive(Debug, Clone, Serialize)]
pub struct CreditRun {
    pub group_column: String,
    pub outcome_column: String,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub contingency: Contingency,
    pub rates: ApprovalRates,
    pub chi_square: ChiSquareResult,
}

/// Load the configured dataset and run the price test on it.
pub fn run_price(config: &PriceConfig) -> Result<(Dataset, PriceRun), AppError> {
    let dataset = load_dataset(Analysis::Pricing, &config.source)?;
    let run = price_test(
        &dataset,
        config.group_column.as_deref(),
        config.value_column.as_deref(),
    )?;
    Ok((dataset, run))
}

/// Load the configured dataset and run the credit decision test on it.
pub fn run_credit(config: &CreditConfig) -> Result<(Dataset, CreditRun), AppError> {
    let dataset = load_dataset(Analysis::Underwriting, &config.source)?;
    let run = credit_test(
        &dataset,
        config.group_column.as_deref(),
        config.outcome_column.as_deref(),
    )?;
    Ok((dataset, run))
}

/// Resolve `(group, value)` column indices for price testing.
///
/// Defaults: first factor column, first numeric column.
pub fn resolve_price_columns(
    dataset: &Dataset,
    group: Option<&str>,
    value: Option<&str>,
) -> Result<(usize, usize), AppError> {
    let group_idx = match group {
        Some(name) => dataset.column_index(name)?,
        None => {
            let name = dataset
                .factor_columns()
                .first()
                .copied()
                .ok_or_else(|| AppError::usage(format!("'{}' has no categorical column to group by.", dataset.name)))?;
            dataset.column_index(name)?
        }
    };

    if dataset.column_kind(group_idx) != ColumnKind::Categorical {
        return Err(AppError::usage(format!(
            "Selected grouping column `{}` is not categorical. ANOVA requires a categorical grouping variable.",
            dataset.headers[group_idx]
        )));
    }

    let value_idx = match value {
        Some(name) => dataset.column_index(name)?,
        None => {
            let name = dataset
                .numeric_columns()
                .first()
                .copied()
                .ok_or_else(|| AppError::usage(format!("'{}' has no numeric column to test.", dataset.name)))?;
            dataset.column_index(name)?
        }
    };

    if dataset.column_kind(value_idx) != ColumnKind::Numeric {
        return Err(AppError::usage(format!(
            "Column `{}` is not numeric. Numeric columns: {}",
            dataset.headers[value_idx],
            dataset.numeric_columns().join(", ")
        )));
    }

    Ok((group_idx, value_idx))
}

/// Resolve `(group, outcome)` column indices for credit decision testing.
///
/// Defaults: first factor column, last factor column other than the group.
pub fn resolve_credit_columns(
    dataset: &Dataset,
    group: Option<&str>,
    outcome: Option<&str>,
) -> Result<(usize, usize), AppError> {
    let factors = dataset.factor_columns();

    let group_idx = match group {
        Some(name) => dataset.column_index(name)?,
        None => {
            let name = factors
                .first()
                .copied()
                .ok_or_else(|| AppError::usage(format!("'{}' has no categorical column to group by.", dataset.name)))?;
            dataset.column_index(name)?
        }
    };

    let outcome_idx = match outcome {
        Some(name) => dataset.column_index(name)?,
        None => {
            let group_name = dataset.headers[group_idx].as_str();
            let name = factors
                .iter()
                .rev()
                .copied()
                .find(|c| *c != group_name)
                .ok_or_else(|| AppError::usage(format!("'{}' has no outcome column besides `{group_name}`.", dataset.name)))?;
            dataset.column_index(name)?
        }
    };

    if group_idx == outcome_idx {
        return Err(AppError::usage("Grouping and outcome columns must differ."));
    }

    Ok((group_idx, outcome_idx))
}

/// Group a numeric column by a categorical one and run a one-way ANOVA.
///
/// A failing ANOVA (one group, zero within-group variance, no residual
/// degrees of freedom) does not fail the run: the group summaries are kept
/// for the distribution table and box plot, and the error is carried in
/// `PriceRun::anova_error`.
pub fn price_test(dataset: &Dataset, group: Option<&str>, value: Option<&str>) -> Result<PriceRun, AppError> {
    let (group_idx, value_idx) = resolve_price_columns(dataset, group, value)?;
    let group_column = dataset.headers[group_idx].clone();
    let value_column = dataset.headers[value_idx].clone();

    let mut groups = Groups::new();
    let mut rows_dropped = 0usize;
    for r in 0..dataset.n_rows() {
        match (dataset.cell(r, group_idx), dataset.numeric_cell(r, value_idx)) {
            (Some(g), Some(v)) => groups.entry(g.to_string()).or_default().push(v),
            _ => rows_dropped += 1,
        }
    }

    let rows_used = dataset.n_rows() - rows_dropped;
    if rows_used == 0 {
        return Err(AppError::no_data(format!(
            "No rows have both `{group_column}` and `{value_column}` present."
        )));
    }

    tracing::info!(
        group = %group_column,
        value = %value_column,
        rows_used,
        rows_dropped,
        groups = groups.len(),
        "price test"
    );

    let summaries = group_summaries(&groups);
    let (anova, anova_error) = match one_way_anova(&group_column, &groups) {
        Ok(table) => (Some(table), None),
        Err(e) => {
            tracing::warn!(group = %group_column, "anova failed: {e}");
            (None, Some(format!("ANOVA failed: {e}")))
        }
    };

    Ok(PriceRun {
        group_column,
        value_column,
        rows_used,
        rows_dropped,
        summaries,
        anova,
        anova_error,
    })
}

/// Cross-tabulate outcome by segment and run a chi-square test.
pub fn credit_test(dataset: &Dataset, group: Option<&str>, outcome: Option<&str>) -> Result<CreditRun, AppError> {
    let (group_idx, outcome_idx) = resolve_credit_columns(dataset, group, outcome)?;
    let group_column = dataset.headers[group_idx].clone();
    let outcome_column = dataset.headers[outcome_idx].clone();

    let pairs: Vec<(&str, &str)> = (0..dataset.n_rows())
        .filter_map(|r| Some((dataset.cell(r, group_idx)?, dataset.cell(r, outcome_idx)?)))
        .collect();

    let rows_used = pairs.len();
    let rows_dropped = dataset.n_rows() - rows_used;
    if rows_used == 0 {
        return Err(AppError::no_data(format!(
            "No rows have both `{group_column}` and `{outcome_column}` present."
        )));
    }

    tracing::info!(
        group = %group_column,
        outcome = %outcome_column,
        rows_used,
        rows_dropped,
        "credit decision test"
    );

    let contingency = crosstab(pairs);
    let rates = approval_rates(&contingency);
    let chi_square = chi2_contingency(&contingency)
        .map_err(|e| AppError::new(e.exit_code(), format!("Chi-square test failed: {e}")))?;

    Ok(CreditRun {
        group_column,
        outcome_column,
        rows_used,
        rows_dropped,
        contingency,
        rates,
        chi_square,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{generate_pricing, generate_underwriting};
    use crate::domain::SampleSpec;
    use crate::io::ingest::read_csv;

    fn sample(gap: f64) -> SampleSpec {
        SampleSpec { seed: 11, rows: 400, gap }
    }

    #[test]
    fn price_defaults_pick_race_and_rate() {
        let ds = generate_pricing(&sample(0.0)).unwrap();
        let run = price_test(&ds, None, None).unwrap();
        assert_eq!(run.group_column, "race");
        assert_eq!(run.value_column, "rate");
        assert_eq!(run.rows_used, 400);
        assert_eq!(run.anova.as_ref().unwrap().factor.source, "C(race)");
    }

    #[test]
    fn large_price_gap_is_detected() {
        // A 3pp gap is five noise standard deviations.
        let ds = generate_pricing(&sample(3.0)).unwrap();
        let run = price_test(&ds, Some("race"), Some("rate")).unwrap();
        assert!(run.p_value() < 0.05);
    }

    #[test]
    fn numeric_group_column_is_rejected() {
        let ds = generate_pricing(&sample(0.0)).unwrap();
        let err = price_test(&ds, Some("loan_amount"), Some("rate")).unwrap_err();
        assert!(err.message().contains("not categorical"));
    }

    #[test]
    fn categorical_value_column_is_rejected() {
        let ds = generate_pricing(&sample(0.0)).unwrap();
        let err = price_test(&ds, Some("race"), Some("sex")).unwrap_err();
        assert!(err.message().contains("not numeric"));
    }

    #[test]
    fn rows_with_missing_cells_are_dropped() {
        let csv = "g,v\nA,1\nA,2\nA,\n,5\nB,4\nB,6\n";
        let ds = read_csv("t.csv", csv.as_bytes()).unwrap();
        let run = price_test(&ds, Some("g"), Some("v")).unwrap();
        assert_eq!(run.rows_used, 4);
        assert_eq!(run.rows_dropped, 2);
        assert_eq!(run.summaries.len(), 2);
    }

    #[test]
    fn failed_anova_keeps_group_summaries() {
        // No within-group variance: F is undefined, but the box plot is not.
        let ds = read_csv("t.csv", "g,v\nA,1\nA,1\nB,2\nB,2\n".as_bytes()).unwrap();
        let run = price_test(&ds, Some("g"), Some("v")).unwrap();
        assert!(run.anova.is_none());
        assert!(run.anova_error.as_deref().unwrap().starts_with("ANOVA failed:"));
        assert!(run.p_value().is_nan());
        assert_eq!(run.summaries.len(), 2);
        assert_eq!(run.summaries[1].median, 2.0);
    }

    #[test]
    fn single_group_still_summarizes() {
        let ds = read_csv("t.csv", "g,v\nA,1\nA,2\nA,4\n".as_bytes()).unwrap();
        let run = price_test(&ds, Some("g"), Some("v")).unwrap();
        assert!(run.anova_error.is_some());
        assert_eq!(run.summaries.len(), 1);
    }

    #[test]
    fn credit_defaults_pick_race_and_decision() {
        let ds = generate_underwriting(&sample(0.0)).unwrap();
        let run = credit_test(&ds, None, None).unwrap();
        assert_eq!(run.group_column, "race");
        assert_eq!(run.outcome_column, "decision");
        assert_eq!(run.rates.outcomes, vec!["Approved", "Denied"]);
        assert_eq!(run.contingency.total(), 400);
    }

    #[test]
    fn large_approval_gap_is_detected() {
        let ds = generate_underwriting(&sample(0.6)).unwrap();
        let run = credit_test(&ds, Some("race"), Some("decision")).unwrap();
        assert!(run.chi_square.p_value < 0.05);
    }

    #[test]
    fn same_group_and_outcome_is_rejected() {
        let ds = generate_underwriting(&sample(0.0)).unwrap();
        assert!(credit_test(&ds, Some("race"), Some("race")).is_err());
    }

    #[test]
    fn runs_end_to_end_from_a_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Pricing_data.csv");
        let ds = generate_pricing(&sample(0.0)).unwrap();
        crate::io::export::write_dataset_csv(&path, &ds).unwrap();

        let config = PriceConfig {
            source: crate::domain::DataSource::File(path),
            group_column: Some("sex".to_string()),
            value_column: Some("apr".to_string()),
            output: crate::domain::OutputConfig::default(),
        };
        let (loaded, run) = run_price(&config).unwrap();
        assert_eq!(loaded.n_rows(), 400);
        let anova = run.anova.unwrap();
        assert_eq!(anova.n_groups, 2);
        assert_eq!(anova.residual.df, 398.0);
    }

    #[test]
    fn credit_runs_on_sample_source() {
        let config = CreditConfig {
            source: crate::domain::DataSource::Sample(sample(0.1)),
            group_column: None,
            outcome_column: None,
            output: crate::domain::OutputConfig::default(),
        };
        let (_, run) = run_credit(&config).unwrap();
        assert_eq!(run.chi_square.dof, 3);
        assert!(!run.chi_square.yates_corrected);
    }
}
