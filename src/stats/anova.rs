//! One-way ANOVA.
//!
//! The F-test is computed from a regression of the value on the group factor:
//!
//! - `SS_resid`: residual sum of squares of the dummy-coded OLS fit
//! - `SS_group = SS_total - SS_resid`
//! - `F = (SS_group / (k - 1)) / (SS_resid / (n - k))`
//! - `PR(>F)` from the F(k - 1, n - k) survival function
//!
//! The output mirrors a regression package's ANOVA summary: one row for the
//! factor (`C(<column>)`) and one for `Residual`.

use nalgebra::DVector;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::domain::{AnovaRow, AnovaTable};
use crate::error::AppError;
use crate::stats::ols::{dummy_design, residual_sum_of_squares, solve_least_squares};
use crate::stats::summary::Groups;

/// Relative tolerance below which the within-group variance counts as zero.
const ZERO_SS_TOL: f64 = 1e-12;

/// Run a one-way ANOVA of the grouped values.
///
/// `factor` is the grouping column name, used to label the factor row.
pub fn one_way_anova(factor: &str, groups: &Groups) -> Result<AnovaTable, AppError> {
    let groups: Vec<(&String, &Vec<f64>)> = groups.iter().filter(|(_, v)| !v.is_empty()).collect();
    let k = groups.len();
    if k < 2 {
        return Err(AppError::runtime(format!(
            "ANOVA requires at least two non-empty groups in `{factor}` (found {k})."
        )));
    }

    let mut levels = Vec::new();
    let mut values = Vec::new();
    for (level, (_, group_values)) in groups.iter().enumerate() {
        for &v in group_values.iter() {
            levels.push(level);
            values.push(v);
        }
    }

    let n = values.len();
    if n <= k {
        return Err(AppError::runtime(format!(
            "ANOVA has no residual degrees of freedom: n={n} observations for k={k} groups."
        )));
    }

    let y = DVector::from_vec(values);
    let x = dummy_design(&levels, k);
    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| AppError::runtime("ANOVA least-squares fit is ill-conditioned."))?;

    let mean = y.mean();
    let ss_total: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_resid = residual_sum_of_squares(&x, &y, &beta).max(0.0);
    let ss_group = (ss_total - ss_resid).max(0.0);

    if ss_resid <= ZERO_SS_TOL * ss_total.max(1.0) {
        return Err(AppError::runtime(
            "ANOVA is undefined: values have zero variance within every group.",
        ));
    }

    let df_group = (k - 1) as f64;
    let df_resid = (n - k) as f64;
    let ms_group = ss_group / df_group;
    let ms_resid = ss_resid / df_resid;
    let f_stat = ms_group / ms_resid;

    let dist = FisherSnedecor::new(df_group, df_resid)
        .map_err(|e| AppError::runtime(format!("F distribution error: {e}")))?;
    let p_value = dist.sf(f_stat).clamp(0.0, 1.0);

    tracing::debug!(factor, n, k, f_stat, p_value, "one-way anova");

    Ok(AnovaTable {
        factor: AnovaRow {
            source: format!("C({factor})"),
            df: df_group,
            sum_sq: ss_group,
            mean_sq: ms_group,
            f_stat: Some(f_stat),
            p_value: Some(p_value),
        },
        residual: AnovaRow {
            source: "Residual".to_string(),
            df: df_resid,
            sum_sq: ss_resid,
            mean_sq: ms_resid,
            f_stat: None,
            p_value: None,
        },
        n_obs: n,
        n_groups: k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(data: &[(&str, &[f64])]) -> Groups {
        data.iter()
            .map(|(g, v)| (g.to_string(), v.to_vec()))
            .collect()
    }

    /// Between/within decomposition straight from group means.
    fn f_from_group_means(groups: &Groups) -> f64 {
        let all: Vec<f64> = groups.values().flatten().copied().collect();
        let grand = all.iter().sum::<f64>() / all.len() as f64;
        let mut ssb = 0.0;
        let mut ssw = 0.0;
        for v in groups.values() {
            let m = v.iter().sum::<f64>() / v.len() as f64;
            ssb += v.len() as f64 * (m - grand).powi(2);
            ssw += v.iter().map(|x| (x - m).powi(2)).sum::<f64>();
        }
        let k = groups.len() as f64;
        let n = all.len() as f64;
        (ssb / (k - 1.0)) / (ssw / (n - k))
    }

    #[test]
    fn known_two_group_values() {
        let g = groups(&[("A", &[1.0, 2.0, 3.0]), ("B", &[4.0, 5.0, 6.0])]);
        let t = one_way_anova("race", &g).unwrap();

        assert_eq!(t.factor.source, "C(race)");
        assert_eq!(t.factor.df, 1.0);
        assert_eq!(t.residual.df, 4.0);
        assert!((t.factor.sum_sq - 13.5).abs() < 1e-9);
        assert!((t.residual.sum_sq - 4.0).abs() < 1e-9);
        assert!((t.f_stat() - 13.5).abs() < 1e-9);
        // F(1, 4) = 13.5 is t(4) = 3.674 two-sided.
        assert!(t.p_value() > 0.02 && t.p_value() < 0.025);
    }

    #[test]
    fn matches_group_mean_decomposition() {
        let g = groups(&[
            ("Asian", &[5.9, 6.1, 6.4, 6.0]),
            ("Black", &[6.8, 7.1, 6.5, 7.4, 6.9]),
            ("White", &[6.2, 6.0, 6.6]),
        ]);
        let t = one_way_anova("race", &g).unwrap();
        assert!((t.f_stat() - f_from_group_means(&g)).abs() < 1e-8);
        assert_eq!(t.n_obs, 12);
        assert_eq!(t.n_groups, 3);
    }

    #[test]
    fn equal_means_are_not_significant() {
        let g = groups(&[
            ("A", &[5.0, 6.0, 7.0, 6.5, 5.5]),
            ("B", &[5.5, 6.5, 6.0, 7.0, 5.0]),
        ]);
        let t = one_way_anova("sex", &g).unwrap();
        assert!(t.f_stat().abs() < 1e-9);
        assert!(t.p_value() > 0.05);
    }

    #[test]
    fn strong_gap_is_significant() {
        let g = groups(&[
            ("A", &[5.0, 5.2, 4.9, 5.1, 5.05]),
            ("B", &[7.0, 7.2, 6.9, 7.1, 7.05]),
        ]);
        let t = one_way_anova("sex", &g).unwrap();
        assert!(t.p_value() < 0.05);
    }

    #[test]
    fn single_group_is_rejected() {
        let g = groups(&[("A", &[1.0, 2.0])]);
        assert!(one_way_anova("g", &g).is_err());
    }

    #[test]
    fn no_residual_df_is_rejected() {
        let g = groups(&[("A", &[1.0]), ("B", &[2.0])]);
        let err = one_way_anova("g", &g).unwrap_err();
        assert!(err.message().contains("no residual degrees of freedom"));
    }

    #[test]
    fn zero_within_variance_is_rejected() {
        let g = groups(&[("A", &[1.0, 1.0]), ("B", &[2.0, 2.0])]);
        let err = one_way_anova("g", &g).unwrap_err();
        assert!(err.message().contains("zero variance"));
    }
}
