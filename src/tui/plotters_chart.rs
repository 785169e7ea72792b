//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `BarChart` widget?
//! - box plots need floating boxes and whiskers, not bars from zero
//! - stacked bars need several colored segments per bar
//! - easy to extend later (outlier points, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! Axis ticks and group names are drawn by the caller with Ratatui text, so both
//! widgets map group `i` to the center of slot `i` on a `-0.5..k-0.5` x axis.

use plotters::prelude::*;
// `ratatui::style::Color` shadows the Plotters trait name; keep its methods.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{ApprovalRates, GroupSummary};

/// High-contrast series palette, shared with the dashboard legend.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0, 200, 0),     // green
    (255, 60, 60),   // red
    (0, 200, 255),   // cyan
    (255, 200, 0),   // yellow
    (200, 100, 255), // magenta
    (200, 200, 200), // grey
];

/// Ratatui color for series `j` (matches the Plotters color).
pub fn series_color(j: usize) -> Color {
    let (r, g, b) = PALETTE[j % PALETTE.len()];
    Color::Rgb(r, g, b)
}

fn plotters_color(j: usize) -> RGBColor {
    let (r, g, b) = PALETTE[j % PALETTE.len()];
    RGBColor(r, g, b)
}

/// Half-width of a box or bar, in group units.
const HALF_WIDTH: f64 = 0.3;

/// Box plot of a numeric column, one box per group.
pub struct BoxPlotChart<'a> {
    pub summaries: &'a [GroupSummary],
    /// Y bounds (value units), computed by the caller.
    pub y_bounds: [f64; 2],
}

/// Stacked bars of outcome proportions, one bar per segment.
pub struct StackedBarChart<'a> {
    pub rates: &'a ApprovalRates,
}

impl<'a> Widget for BoxPlotChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) || self.summaries.is_empty() {
            return;
        }

        let [y0, y1] = self.y_bounds;
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }
        let k = self.summaries.len();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).build_cartesian_2d(-0.5..(k as f64 - 0.5), y0..y1)?;

            let box_color = plotters_color(2);
            let median_color = plotters_color(3);

            for (i, s) in self.summaries.iter().enumerate() {
                let x = i as f64;
                let cap = HALF_WIDTH / 2.0;

                // Whiskers + caps.
                chart.draw_series([
                    PathElement::new(vec![(x, s.min), (x, s.q1)], &WHITE),
                    PathElement::new(vec![(x, s.q3), (x, s.max)], &WHITE),
                    PathElement::new(vec![(x - cap, s.min), (x + cap, s.min)], &WHITE),
                    PathElement::new(vec![(x - cap, s.max), (x + cap, s.max)], &WHITE),
                ])?;

                // Box outline (q1..q3), then the median on top.
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - HALF_WIDTH, s.q1), (x + HALF_WIDTH, s.q3)],
                    &box_color,
                )))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x - HALF_WIDTH, s.median), (x + HALF_WIDTH, s.median)],
                    &median_color,
                )))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

impl<'a> Widget for StackedBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) || self.rates.groups.is_empty() {
            return;
        }
        let k = self.rates.groups.len();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).build_cartesian_2d(-0.5..(k as f64 - 0.5), 0.0..1.0)?;

            for (i, shares) in self.rates.rates.iter().enumerate() {
                let x = i as f64;
                let mut base = 0.0;
                for (j, share) in shares.iter().enumerate() {
                    let top = (base + share).min(1.0);
                    chart.draw_series(std::iter::once(Rectangle::new(
                        [(x - HALF_WIDTH, base), (x + HALF_WIDTH, top)],
                        plotters_color(j).filled(),
                    )))?;
                    base = top;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Render a resize hint instead of a chart when the area is tiny.
fn too_small(area: Rect, buf: &mut Buffer) -> bool {
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}
