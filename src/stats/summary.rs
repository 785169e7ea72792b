//! Descriptive statistics per group (box-plot inputs).

use std::collections::BTreeMap;

use crate::domain::GroupSummary;

/// Numeric observations bucketed by group label, in label order.
pub type Groups = BTreeMap<String, Vec<f64>>;

/// Compute box-plot statistics for every group.
///
/// Quartiles use linear interpolation between order statistics.
pub fn group_summaries(groups: &Groups) -> Vec<GroupSummary> {
    groups
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(group, values)| summarize(group, values))
        .collect()
}

fn summarize(group: &str, values: &[f64]) -> GroupSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n as f64 - 1.0)).sqrt()
    });

    GroupSummary {
        group: group.to_string(),
        n,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&v, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&v, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&v, 0.75) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn summaries_follow_label_order() {
        let mut groups = Groups::new();
        groups.insert("b".to_string(), vec![3.0, 1.0, 2.0]);
        groups.insert("a".to_string(), vec![10.0]);

        let out = group_summaries(&groups);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].group, "a");
        assert_eq!(out[0].std, None);
        assert_eq!(out[1].median, 2.0);
        assert_eq!(out[1].min, 1.0);
        assert_eq!(out[1].max, 3.0);
        assert!((out[1].std.unwrap() - 1.0).abs() < 1e-12);
    }
}
