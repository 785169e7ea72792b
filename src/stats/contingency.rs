//! Contingency tables, approval rates, and the chi-square test of independence.
//!
//! The test follows the usual `chi2_contingency` conventions:
//!
//! - `expected[i][j] = row_total[i] * col_total[j] / N`
//! - `dof = (r - 1) * (c - 1)`
//! - for `dof == 1` Yates' continuity correction moves each observed count
//!   toward its expectation by `min(0.5, |E - O|)`
//! - `dof == 0` yields a statistic of 0 and a p-value of 1

use std::collections::{BTreeMap, BTreeSet};

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::domain::{ApprovalRates, ChiSquareResult, Contingency};
use crate::error::AppError;

/// Cross-tabulate `(segment, outcome)` label pairs.
///
/// Row and column labels come out in lexicographic order.
pub fn crosstab<'a, I>(pairs: I) -> Contingency
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut cells: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    let mut rows = BTreeSet::new();
    let mut cols = BTreeSet::new();

    for (row, col) in pairs {
        *cells.entry((row, col)).or_insert(0) += 1;
        rows.insert(row);
        cols.insert(col);
    }

    let counts = rows
        .iter()
        .map(|r| {
            cols.iter()
                .map(|c| cells.get(&(*r, *c)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Contingency {
        row_labels: rows.into_iter().map(str::to_string).collect(),
        col_labels: cols.into_iter().map(str::to_string).collect(),
        counts,
    }
}

/// Outcome shares per segment; outcomes a segment never saw get 0.
pub fn approval_rates(table: &Contingency) -> ApprovalRates {
    let rates = table
        .counts
        .iter()
        .map(|row| {
            let total: u64 = row.iter().sum();
            row.iter()
                .map(|&c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
                .collect()
        })
        .collect();

    ApprovalRates {
        groups: table.row_labels.clone(),
        outcomes: table.col_labels.clone(),
        rates,
    }
}

/// Chi-square test of independence on a contingency table.
pub fn chi2_contingency(table: &Contingency) -> Result<ChiSquareResult, AppError> {
    let r = table.row_labels.len();
    let c = table.col_labels.len();
    let n = table.total();
    if r == 0 || c == 0 || n == 0 {
        return Err(AppError::runtime("Chi-square test needs a non-empty contingency table."));
    }

    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    let n = n as f64;

    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|&rt| col_totals.iter().map(|&ct| rt as f64 * ct as f64 / n).collect())
        .collect();

    for (i, row) in expected.iter().enumerate() {
        if let Some(j) = row.iter().position(|&e| e <= 0.0) {
            return Err(AppError::runtime(format!(
                "The expected frequency table has a zero element at ({}, {}).",
                table.row_labels[i], table.col_labels[j]
            )));
        }
    }

    let dof = (r - 1) * (c - 1);
    if dof == 0 {
        return Ok(ChiSquareResult {
            statistic: 0.0,
            p_value: 1.0,
            dof,
            expected,
            yates_corrected: false,
        });
    }

    let yates = dof == 1;
    let mut statistic = 0.0;
    for (obs_row, exp_row) in table.counts.iter().zip(&expected) {
        for (&o, &e) in obs_row.iter().zip(exp_row) {
            let mut o = o as f64;
            if yates {
                let diff = e - o;
                o += diff.signum() * diff.abs().min(0.5);
            }
            statistic += (o - e).powi(2) / e;
        }
    }

    let dist = ChiSquared::new(dof as f64)
        .map_err(|e| AppError::runtime(format!("Chi-squared distribution error: {e}")))?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);

    tracing::debug!(rows = r, cols = c, dof, statistic, p_value, yates, "chi-square test");

    Ok(ChiSquareResult {
        statistic,
        p_value,
        dof,
        expected,
        yates_corrected: yates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&str], cols: &[&str], counts: &[&[u64]]) -> Contingency {
        Contingency {
            row_labels: rows.iter().map(|s| s.to_string()).collect(),
            col_labels: cols.iter().map(|s| s.to_string()).collect(),
            counts: counts.iter().map(|r| r.to_vec()).collect(),
        }
    }

    fn repeat<'a>(seg: &'a str, out: &'a str, n: usize) -> impl Iterator<Item = (&'a str, &'a str)> {
        std::iter::repeat((seg, out)).take(n)
    }

    #[test]
    fn crosstab_orders_labels_and_fills_zeros() {
        let pairs = repeat("B", "Denied", 2)
            .chain(repeat("A", "Approved", 3))
            .chain(repeat("B", "Approved", 1));
        let t = crosstab(pairs);
        assert_eq!(t.row_labels, vec!["A", "B"]);
        assert_eq!(t.col_labels, vec!["Approved", "Denied"]);
        assert_eq!(t.counts, vec![vec![3, 0], vec![1, 2]]);
    }

    #[test]
    fn approval_rates_sum_to_one() {
        let t = table(&["A", "B"], &["Approved", "Denied"], &[&[3, 0], &[1, 3]]);
        let rates = approval_rates(&t);
        assert_eq!(rates.rates[0], vec![1.0, 0.0]);
        assert!((rates.rates[1][0] - 0.25).abs() < 1e-12);
        for row in &rates.rates {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn yates_corrected_two_by_two() {
        let t = table(&["A", "B"], &["Approved", "Denied"], &[&[10, 20], &[20, 10]]);
        let res = chi2_contingency(&t).unwrap();
        assert!(res.yates_corrected);
        assert_eq!(res.dof, 1);
        assert!((res.statistic - 5.4).abs() < 1e-9);
        assert!(res.p_value > 0.019 && res.p_value < 0.022);
        assert!((res.expected[0][0] - 15.0).abs() < 1e-12);
    }

    #[test]
    fn larger_tables_are_not_corrected() {
        let t = table(
            &["A", "B", "C"],
            &["Approved", "Denied"],
            &[&[10, 20], &[20, 10], &[15, 15]],
        );
        let res = chi2_contingency(&t).unwrap();
        assert!(!res.yates_corrected);
        assert_eq!(res.dof, 2);
        // Expected 15 everywhere; (5^2/15) * 4 cells.
        assert!((res.statistic - 100.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn proportional_rates_are_not_significant() {
        let t = table(&["A", "B"], &["Approved", "Denied"], &[&[80, 20], &[40, 10]]);
        let res = chi2_contingency(&t).unwrap();
        assert!(res.statistic.abs() < 1e-12);
        assert!(res.p_value > 0.05);
    }

    #[test]
    fn strong_disparity_is_significant() {
        let t = table(&["A", "B"], &["Approved", "Denied"], &[&[90, 10], &[30, 70]]);
        let res = chi2_contingency(&t).unwrap();
        assert!(res.p_value < 0.05);
    }

    #[test]
    fn single_outcome_level_has_zero_dof() {
        let t = table(&["A", "B"], &["Approved"], &[&[5], &[7]]);
        let res = chi2_contingency(&t).unwrap();
        assert_eq!(res.dof, 0);
        assert_eq!(res.statistic, 0.0);
        assert_eq!(res.p_value, 1.0);
    }

    #[test]
    fn empty_table_is_rejected() {
        let t = crosstab(std::iter::empty());
        assert!(chi2_contingency(&t).is_err());
    }
}
