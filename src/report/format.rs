//! Formatted terminal output: data preview, summaries, test tables.
//!
//! We keep formatting code in one place so:
//! - the statistics code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::{CreditRun, PriceRun};
use crate::domain::{AnovaRow, OutputConfig, is_significant};
use crate::io::ingest::Dataset;

/// Widest a preview cell is allowed to get before truncation.
const MAX_CELL: usize = 18;

/// Header block shared by both reports.
pub fn format_dataset_header(title: &str, dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== fairlend - {title} ===\n"));
    out.push_str(&format!(
        "Dataset: {} | rows={} | cols={}",
        dataset.name,
        dataset.n_rows(),
        dataset.n_cols()
    ));
    let skipped = crate::io::ingest::skipped_rows(&dataset.row_errors);
    if skipped > 0 {
        out.push_str(&format!(" | skipped lines={skipped}"));
    }
    let padded = dataset.row_errors.len() - skipped;
    if padded > 0 {
        out.push_str(&format!(" | padded lines={padded}"));
    }
    out.push('\n');
    out
}

/// First `n` rows as an aligned table (`df.head(n)`).
pub fn format_preview(dataset: &Dataset, n: usize) -> String {
    let rows = dataset.head(n);
    let widths: Vec<usize> = (0..dataset.n_cols())
        .map(|c| {
            let header = dataset.headers[c].chars().count();
            let cells = rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0);
            header.max(cells).min(MAX_CELL)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = dataset
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<w$}", truncate(h, w)))
        .collect();
    push_line(&mut out, &header.join("  "));

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, &rule.join("  "));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", truncate(cell, w)))
            .collect();
        push_line(&mut out, &cells.join("  "));
    }

    out
}

/// Full price-testing report (minus the chart).
pub fn format_price_report(dataset: &Dataset, run: &PriceRun, output: &OutputConfig) -> String {
    let mut out = format_dataset_header("Price Testing", dataset);
    out.push_str(&format!(
        "Columns: group={} value={} | used={} dropped={}\n",
        run.group_column, run.value_column, run.rows_used, run.rows_dropped
    ));

    if output.preview_rows > 0 {
        out.push_str("\n### Data Preview\n");
        out.push_str(&format_preview(dataset, output.preview_rows));
    }

    out.push_str(&format!(
        "\n### Distribution of {} by {}\n",
        run.value_column, run.group_column
    ));
    out.push_str(&format_group_summaries(run));

    out.push_str("\n### ANOVA Test Results\n");
    out.push_str(&format_anova_table(run));
    out.push('\n');
    if run.anova.is_some() {
        out.push_str(&format_verdict(run.p_value(), output.alpha, "price differences by", &run.group_column));
    }

    out
}

fn format_group_summaries(run: &PriceRun) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!(
            "{:<16} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "group", "n", "mean", "std", "min", "q1", "median", "q3", "max"
        ),
    );
    for s in &run.summaries {
        push_line(
            &mut out,
            &format!(
                "{:<16} {:>6} {:>10.4} {:>10} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                truncate(&s.group, 16),
                s.n,
                s.mean,
                s.std.map(|v| format!("{v:.4}")).unwrap_or_else(|| "NaN".to_string()),
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max,
            ),
        );
    }
    out
}

/// ANOVA summary table, rounded to 4 decimals. A failed ANOVA renders as its
/// error message.
pub fn format_anova_table(run: &PriceRun) -> String {
    let Some(anova) = &run.anova else {
        let msg = run.anova_error.as_deref().unwrap_or("ANOVA failed.");
        return format!("{msg}\n");
    };

    let mut out = String::new();
    let width = anova.factor.source.chars().count().max(8);
    push_line(
        &mut out,
        &format!(
            "{:<width$} {:>8} {:>14} {:>14} {:>12} {:>10}",
            "", "df", "sum_sq", "mean_sq", "F", "PR(>F)"
        ),
    );
    for row in [&anova.factor, &anova.residual] {
        push_line(&mut out, &format_anova_row(row, width));
    }
    out
}

fn format_anova_row(row: &AnovaRow, width: usize) -> String {
    let opt = |v: Option<f64>| v.map(|x| format!("{x:.4}")).unwrap_or_else(|| "NaN".to_string());
    format!(
        "{:<width$} {:>8.1} {:>14.4} {:>14.4} {:>12} {:>10}",
        row.source,
        row.df,
        row.sum_sq,
        row.mean_sq,
        opt(row.f_stat),
        opt(row.p_value),
    )
}

/// Full credit-decision report (minus the chart).
pub fn format_credit_report(dataset: &Dataset, run: &CreditRun, output: &OutputConfig) -> String {
    let mut out = format_dataset_header("Credit Decision Testing", dataset);
    out.push_str(&format!(
        "Columns: group={} outcome={} | used={} dropped={}\n",
        run.group_column, run.outcome_column, run.rows_used, run.rows_dropped
    ));

    if output.preview_rows > 0 {
        out.push_str("\n### Data Preview\n");
        out.push_str(&format_preview(dataset, output.preview_rows));
    }

    out.push_str(&format!("\n### Approval Rates by {}\n", run.group_column));
    out.push_str(&format_approval_rates(run));

    out.push_str("\n### Chi-Square Test\n");
    out.push_str(&format_chi_square(run));
    out.push_str(&format_verdict(
        run.chi_square.p_value,
        output.alpha,
        &format!("`{}` depending on", run.outcome_column),
        &run.group_column,
    ));

    out
}

/// Approval-rate table, rounded to 3 decimals.
pub fn format_approval_rates(run: &CreditRun) -> String {
    let rates = &run.rates;
    let label_w = rates
        .groups
        .iter()
        .map(|g| g.chars().count())
        .chain([run.group_column.chars().count()])
        .max()
        .unwrap_or(8)
        .min(MAX_CELL);
    let col_w: Vec<usize> = rates
        .outcomes
        .iter()
        .map(|o| o.chars().count().clamp(6, MAX_CELL))
        .collect();

    let mut out = String::new();
    let mut header = format!("{:<label_w$}", truncate(&run.group_column, label_w));
    for (o, &w) in rates.outcomes.iter().zip(&col_w) {
        header.push_str(&format!("  {:>w$}", truncate(o, w)));
    }
    push_line(&mut out, &header);

    for (g, row) in rates.groups.iter().zip(&rates.rates) {
        let mut line = format!("{:<label_w$}", truncate(g, label_w));
        for (v, &w) in row.iter().zip(&col_w) {
            line.push_str(&format!("  {v:>w$.3}"));
        }
        push_line(&mut out, &line);
    }
    out
}

/// Chi-square statistic block.
pub fn format_chi_square(run: &CreditRun) -> String {
    let chi = &run.chi_square;
    let mut out = String::new();
    out.push_str(&format!("Chi-square Statistic: {:.4}\n", chi.statistic));
    out.push_str(&format!("p-value: {:.4}\n", chi.p_value));
    out.push_str(&format!("Degrees of freedom: {}", chi.dof));
    if chi.yates_corrected {
        out.push_str(" (Yates' continuity correction applied)");
    }
    out.push('\n');
    out
}

/// One-line significance verdict at level `alpha`.
pub fn format_verdict(p_value: f64, alpha: f64, what: &str, group: &str) -> String {
    if is_significant(p_value, alpha) {
        format!("Result: significant {what} `{group}` (p={p_value:.4} < alpha={alpha})\n")
    } else {
        format!("Result: no significant {what} `{group}` (p={p_value:.4} >= alpha={alpha})\n")
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
