//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two charts:
//! - box plot, one band per group: `|` whisker caps, `-` whiskers,
//!   `[` `]` quartiles, `=` box, `:` median
//! - stacked horizontal bars of outcome proportions, one band per segment
//!
//! `height` is the number of plot rows; each group gets an equal band of at
//! least one row. The labelled middle row of a band carries the whiskers, the
//! other rows repeat the box (or the bar) to give it thickness.

use crate::domain::{ApprovalRates, GroupSummary};

/// Fill characters for successive outcome levels in stacked bars.
const STACK_CHARS: [char; 8] = ['#', '=', '+', 'o', '*', '.', 'x', '%'];

/// Longest group label kept in the left margin.
const MAX_LABEL: usize = 14;

/// Render a horizontal box plot of `value` by `group`.
pub fn render_box_plot(
    summaries: &[GroupSummary],
    value: &str,
    group: &str,
    width: usize,
    height: usize,
) -> String {
    let mut out = format!("Box plot: {value} by {group}\n");
    let Some((lo, hi)) = value_range(summaries) else {
        out.push_str("(no data)\n");
        return out;
    };

    let label_w = label_width(summaries.iter().map(|s| s.group.as_str()));
    let plot_w = plot_width(width, label_w);
    let band = band_rows(height, summaries.len());

    for s in summaries {
        let x = |v: f64| map_x(v, lo, hi, plot_w);

        let mut body = vec![' '; plot_w];
        fill(&mut body, x(s.q1), x(s.q3), '=');
        body[x(s.q1)] = '[';
        body[x(s.q3)] = ']';
        body[x(s.median)] = ':';

        let mut whiskers = vec![' '; plot_w];
        fill(&mut whiskers, x(s.min), x(s.max), '-');
        fill(&mut whiskers, x(s.q1), x(s.q3), '=');
        whiskers[x(s.q1)] = '[';
        whiskers[x(s.q3)] = ']';
        whiskers[x(s.min)] = '|';
        whiskers[x(s.max)] = '|';
        whiskers[x(s.median)] = ':';

        push_band(&mut out, &s.group, label_w, band, &whiskers, &body);
    }

    push_axis(&mut out, label_w, plot_w, &format!("{lo:.2}"), &format!("{hi:.2}"));
    out
}

/// Render stacked horizontal bars of outcome shares per segment.
pub fn render_stacked_bars(
    rates: &ApprovalRates,
    outcome: &str,
    group: &str,
    width: usize,
    height: usize,
) -> String {
    let mut out = format!("Stacked proportions: {outcome} by {group}\n");
    if rates.groups.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let label_w = label_width(rates.groups.iter().map(String::as_str));
    let plot_w = plot_width(width, label_w);
    let band = band_rows(height, rates.groups.len());

    for (g, shares) in rates.groups.iter().zip(&rates.rates) {
        let mut row = vec![' '; plot_w];
        let mut cum = 0.0;
        let mut start = 0usize;
        for (j, share) in shares.iter().enumerate() {
            cum += share;
            // Cumulative rounding keeps every bar exactly `plot_w` wide.
            let end = ((cum * plot_w as f64).round() as usize).min(plot_w);
            for cell in row.iter_mut().take(end).skip(start) {
                *cell = STACK_CHARS[j % STACK_CHARS.len()];
            }
            start = end.max(start);
        }
        push_band(&mut out, g, label_w, band, &row, &row);
    }

    push_axis(&mut out, label_w, plot_w, "0", "1");

    let legend: Vec<String> = rates
        .outcomes
        .iter()
        .enumerate()
        .map(|(j, o)| format!("{} {o}", STACK_CHARS[j % STACK_CHARS.len()]))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));
    out
}

/// Rows per group band: `height` split evenly, never less than one.
fn band_rows(height: usize, groups: usize) -> usize {
    (height / groups.max(1)).max(1)
}

/// Write one band: `labelled` on the middle row, `filler` elsewhere.
fn push_band(out: &mut String, label: &str, label_w: usize, band: usize, labelled: &[char], filler: &[char]) {
    let mid = band / 2;
    for r in 0..band {
        if r == mid {
            push_row(out, label, label_w, labelled);
        } else {
            push_row(out, "", label_w, filler);
        }
    }
}

fn value_range(summaries: &[GroupSummary]) -> Option<(f64, f64)> {
    let lo = summaries.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = summaries.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    if hi - lo < 1e-12 {
        return Some((lo - 0.5, hi + 0.5));
    }
    Some((lo, hi))
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(1).clamp(1, MAX_LABEL)
}

fn plot_width(width: usize, label_w: usize) -> usize {
    width.saturating_sub(label_w + 1).max(10)
}

fn map_x(v: f64, lo: f64, hi: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn fill(row: &mut [char], from: usize, to: usize, ch: char) {
    for cell in row.iter_mut().take(to + 1).skip(from) {
        *cell = ch;
    }
}

fn push_row(out: &mut String, label: &str, label_w: usize, row: &[char]) {
    let label = crate::report::format::truncate(label, label_w);
    let line = format!("{label:<label_w$} {}", row.iter().collect::<String>());
    out.push_str(line.trim_end());
    out.push('\n');
}

fn push_axis(out: &mut String, label_w: usize, plot_w: usize, left: &str, right: &str) {
    let gap = plot_w.saturating_sub(left.len() + right.len());
    out.push_str(&format!("{:label_w$} {left}{}{right}\n", "", " ".repeat(gap)));
}
