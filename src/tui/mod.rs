//! Ratatui-based terminal dashboard.
//!
//! Two tabs, "Price Testing" and "Credit Decision Testing", each with a column
//! selector, a data preview, the test results and a chart. Every key press that
//! changes a selection re-runs the shared pipeline; failures land in the status
//! bar instead of aborting the session.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};

use crate::app::pipeline::{CreditRun, PriceRun, credit_test, price_test};
use crate::cli::TuiArgs;
use crate::domain::{Analysis, DataSource, OutputConfig, SampleSpec, is_significant};
use crate::error::AppError;
use crate::io::ingest::Dataset;

mod plotters_chart;

use plotters_chart::{BoxPlotChart, StackedBarChart, series_color};

/// Start the dashboard.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    // Load before touching the terminal so a bad `--pricing-file` is a plain error.
    let mut app = App::new(&args)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Result of the last pipeline run on a tab.
#[derive(Debug)]
enum TabRun {
    Price(PriceRun),
    Credit(CreditRun),
}

/// One dashboard tab: its dataset, the two selected columns and the last run.
struct TabState {
    analysis: Analysis,
    source: DataSource,
    dataset: Option<Dataset>,
    /// Grouping column (both tabs).
    group: Option<String>,
    /// Price column (pricing) or decision column (underwriting).
    target: Option<String>,
    run: Option<TabRun>,
    /// Last load or test failure for this tab.
    error: Option<String>,
}

impl TabState {
    fn new(analysis: Analysis, source: DataSource) -> Self {
        Self {
            analysis,
            source,
            dataset: None,
            group: None,
            target: None,
            run: None,
            error: None,
        }
    }

    fn load(&mut self) {
        match crate::data::load_dataset(self.analysis, &self.source) {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.error = None;
            }
            Err(err) => {
                self.dataset = None;
                self.run = None;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Re-run the test on the current selection. Resolved defaults are written
    /// back so column cycling starts from what is on screen.
    fn rerun(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let group = self.group.as_deref();
        let target = self.target.as_deref();
        let result = match self.analysis {
            Analysis::Pricing => price_test(dataset, group, target).map(|run| {
                self.group = Some(run.group_column.clone());
                self.target = Some(run.value_column.clone());
                TabRun::Price(run)
            }),
            Analysis::Underwriting => credit_test(dataset, group, target).map(|run| {
                self.group = Some(run.group_column.clone());
                self.target = Some(run.outcome_column.clone());
                TabRun::Credit(run)
            }),
        };

        match result {
            Ok(run) => {
                // A failed ANOVA keeps its summaries on screen; the status bar still reports it.
                self.error = match &run {
                    TabRun::Price(price) => price.anova_error.clone(),
                    TabRun::Credit(_) => None,
                };
                self.run = Some(run);
            }
            Err(err) => {
                self.run = None;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Move the selected field to the next/previous dataset column.
    fn cycle(&mut self, field: usize, delta: i32) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        if dataset.n_cols() == 0 {
            return;
        }

        let current = if field == 0 { &self.group } else { &self.target };
        let pos = current
            .as_deref()
            .and_then(|name| dataset.headers.iter().position(|h| h == name))
            .unwrap_or(0);
        let n = dataset.n_cols() as i64;
        let next = (pos as i64 + delta as i64).rem_euclid(n) as usize;
        let name = Some(dataset.headers[next].clone());

        if field == 0 {
            self.group = name;
        } else {
            self.target = name;
        }
        self.rerun();
    }

    fn field_labels(&self) -> [&'static str; 2] {
        match self.analysis {
            Analysis::Pricing => ["Grouping column", "Price column"],
            Analysis::Underwriting => ["Segment column", "Decision column"],
        }
    }
}

struct App {
    tabs: [TabState; 2],
    active: usize,
    selected_field: usize,
    status: String,
    output: OutputConfig,
}

impl App {
    fn new(args: &TuiArgs) -> Result<Self, AppError> {
        let source = |file: &Option<std::path::PathBuf>, gap: f64| -> Result<DataSource, AppError> {
            match file {
                Some(path) => Ok(DataSource::File(crate::cli::picker::validate_csv_path(path)?)),
                None => Ok(DataSource::Sample(SampleSpec {
                    seed: args.seed,
                    rows: args.rows,
                    gap,
                })),
            }
        };

        let mut app = Self {
            tabs: [
                TabState::new(Analysis::Pricing, source(&args.pricing_file, args.price_gap)?),
                TabState::new(Analysis::Underwriting, source(&args.uw_file, args.approval_gap)?),
            ],
            active: 0,
            selected_field: 0,
            status: String::new(),
            output: OutputConfig::default(),
        };

        for tab in &mut app.tabs {
            tab.load();
            tab.rerun();
        }
        app.refresh_status("Ready.");
        Ok(app)
    }

    fn tab(&self) -> &TabState {
        &self.tabs[self.active]
    }

    fn tab_mut(&mut self) -> &mut TabState {
        &mut self.tabs[self.active]
    }

    /// Show the active tab's error if there is one, `ok` otherwise.
    fn refresh_status(&mut self, ok: &str) {
        self.status = match &self.tab().error {
            Some(err) => format!("error: {err}"),
            None => ok.to_string(),
        };
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a key press. Returns `true` when the dashboard should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.active = (self.active + 1) % self.tabs.len();
                let name = self.tab().analysis.display_name();
                self.refresh_status(name);
            }
            KeyCode::Up => self.selected_field = 0,
            KeyCode::Down => self.selected_field = 1,
            KeyCode::Left | KeyCode::Right => {
                let delta = if code == KeyCode::Left { -1 } else { 1 };
                let field = self.selected_field;
                self.tab_mut().cycle(field, delta);
                let label = self.tab().field_labels()[field];
                let value = if field == 0 { &self.tab().group } else { &self.tab().target };
                let msg = format!("{label}: {}", value.as_deref().unwrap_or("-"));
                self.refresh_status(&msg);
            }
            KeyCode::Char('r') => self.reseed(),
            _ => {}
        }
        false
    }

    /// Draw a fresh synthetic dataset for the active tab (sample sources only).
    fn reseed(&mut self) {
        let tab = self.tab_mut();
        let DataSource::Sample(spec) = &mut tab.source else {
            self.status = "Reseeding only applies to the synthetic sample.".to_string();
            return;
        };
        spec.seed = spec.seed.wrapping_add(1);
        let seed = spec.seed;

        tab.load();
        tab.rerun();
        self.refresh_status(&format!("Resampled (seed={seed})."));
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_tabs(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<&str> = self.tabs.iter().map(|t| t.analysis.display_name()).collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().title("fairlend").borders(Borders::ALL))
            .select(self.active)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(9), Constraint::Min(0)])
            .split(cols[0]);

        self.draw_settings(frame, left[0]);
        self.draw_preview(frame, left[1]);
        self.draw_results(frame, left[2]);
        self.draw_chart(frame, cols[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tab = self.tab();
        let [group_label, target_label] = tab.field_labels();

        let items = vec![
            ListItem::new(format!("{group_label}: {}", tab.group.as_deref().unwrap_or("-"))),
            ListItem::new(format!("{target_label}: {}", tab.target.as_deref().unwrap_or("-"))),
            ListItem::new(Span::styled(
                format!("Source: {}", tab.source.describe()),
                Style::default().fg(Color::Gray),
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = match &self.tab().dataset {
            Some(ds) => crate::report::format_preview(ds, self.output.preview_rows),
            None => "No dataset loaded.".to_string(),
        };
        let p = Paragraph::new(text).block(Block::default().title("Data Preview").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tab = self.tab();
        let alpha = self.output.alpha;

        let (title, body, p_value) = match &tab.run {
            Some(TabRun::Price(run)) if run.anova.is_none() => {
                let msg = run.anova_error.as_deref().unwrap_or("ANOVA failed.");
                let p = Paragraph::new(msg.to_string())
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().title("ANOVA Test Results").borders(Borders::ALL));
                frame.render_widget(p, area);
                return;
            }
            Some(TabRun::Price(run)) => (
                "ANOVA Test Results",
                crate::report::format_anova_table(run),
                run.p_value(),
            ),
            Some(TabRun::Credit(run)) => (
                "Chi-Square Test",
                format!(
                    "{}\n{}",
                    crate::report::format_chi_square(run),
                    crate::report::format_approval_rates(run)
                ),
                run.chi_square.p_value,
            ),
            None => {
                let msg = tab.error.as_deref().unwrap_or("No results.");
                let p = Paragraph::new(msg.to_string())
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().title("Results").borders(Borders::ALL));
                frame.render_widget(p, area);
                return;
            }
        };

        let verdict_style = if is_significant(p_value, alpha) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let verdict = if is_significant(p_value, alpha) {
            format!("Significant at alpha={alpha} (p={p_value:.4})")
        } else {
            format!("Not significant at alpha={alpha} (p={p_value:.4})")
        };

        let mut lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(verdict, verdict_style)));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tab = self.tab();
        let title = match &tab.run {
            Some(TabRun::Price(run)) => format!("Distribution of {} by {}", run.value_column, run.group_column),
            Some(TabRun::Credit(run)) => format!("Approval Rates by {}", run.group_column),
            None => "Chart".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &tab.run else {
            let msg = Paragraph::new("Waiting for data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        match run {
            TabRun::Price(run) => {
                let Some(y_bounds) = box_plot_bounds(run) else {
                    return;
                };
                let groups: Vec<&str> = run.summaries.iter().map(|s| s.group.as_str()).collect();
                let (chart_rect, insets) = chart_layout(inner);
                frame.render_widget(
                    BoxPlotChart {
                        summaries: &run.summaries,
                        y_bounds,
                    },
                    chart_rect,
                );
                if let Some(insets) = insets {
                    draw_axis_ticks(frame, inner, chart_rect, insets, &groups, y_bounds, &run.value_column);
                }
            }
            TabRun::Credit(run) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(1)])
                    .split(inner);
                let groups: Vec<&str> = run.rates.groups.iter().map(String::as_str).collect();
                let (chart_rect, insets) = chart_layout(rows[0]);
                frame.render_widget(StackedBarChart { rates: &run.rates }, chart_rect);
                if let Some(insets) = insets {
                    draw_axis_ticks(frame, rows[0], chart_rect, insets, &groups, [0.0, 1.0], "Proportion");
                }
                frame.render_widget(Paragraph::new(legend(&run.rates.outcomes)), rows[1]);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab switch  ↑/↓ select  ←/→ column  r resample  q quit";
        let status_style = if self.status.starts_with("error:") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, status_style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Y bounds for the box plot: data range padded by 5%.
fn box_plot_bounds(run: &PriceRun) -> Option<[f64; 2]> {
    let lo = run.summaries.iter().map(|s| s.min).fold(f64::INFINITY, f64::min);
    let hi = run.summaries.iter().map(|s| s.max).fold(f64::NEG_INFINITY, f64::max);
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    let pad = ((hi - lo).abs() * 0.05).max(1e-6);
    Some([lo - pad, hi + pad])
}

fn legend(outcomes: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    for (j, o) in outcomes.iter().enumerate() {
        spans.push(Span::styled("■ ", Style::default().fg(series_color(j))));
        spans.push(Span::raw(format!("{o}  ")));
    }
    Line::from(spans)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Column of group `i` out of `k` in a chart `width` cells wide.
fn group_center(i: usize, k: usize, width: u16) -> u16 {
    let u = (i as f64 + 0.5) / k as f64;
    (width.saturating_sub(1) as f64 * u).round() as u16
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    groups: &[&str],
    y_bounds: [f64; 2],
    y_desc: &str,
) {
    let style = Style::default().fg(Color::Gray);

    // Group names under each box/bar.
    let slot = (chart.width as usize / groups.len().max(1)).max(1);
    let y = chart.y + chart.height;
    if y < inner.y + inner.height {
        for (i, g) in groups.iter().enumerate() {
            let label = crate::report::format::truncate(g, slot.saturating_sub(1).max(1));
            let label_len = label.chars().count() as u16;
            let x = chart.x + group_center(i, groups.len(), chart.width);
            let start = x.saturating_sub(label_len / 2).max(chart.x);
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y,
                    width: label_len.min(chart.x + chart.width - start),
                    height: 1,
                },
            );
        }
    }

    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let y_label =
        Paragraph::new(y_desc.to_string()).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(insets.left + chart.width),
        height: 1,
    };
    frame.render_widget(y_label.alignment(Alignment::Left), y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn args() -> TuiArgs {
        TuiArgs {
            pricing_file: None,
            uw_file: None,
            seed: 5,
            rows: 300,
            price_gap: 0.25,
            approval_gap: 0.10,
        }
    }

    #[test]
    fn starts_with_both_tabs_computed() {
        let app = App::new(&args()).unwrap();
        assert!(matches!(app.tabs[0].run, Some(TabRun::Price(_))));
        assert!(matches!(app.tabs[1].run, Some(TabRun::Credit(_))));
        assert_eq!(app.tabs[0].group.as_deref(), Some("race"));
        assert_eq!(app.tabs[0].target.as_deref(), Some("rate"));
        assert_eq!(app.tabs[1].target.as_deref(), Some("decision"));
        assert_eq!(app.status, "Ready.");
    }

    #[test]
    fn tab_switches_and_q_quits() {
        let mut app = App::new(&args()).unwrap();
        assert!(!app.handle_key(KeyCode::Tab));
        assert_eq!(app.active, 1);
        assert_eq!(app.status, "Credit Decision Testing");
        assert!(!app.handle_key(KeyCode::Tab));
        assert_eq!(app.active, 0);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn cycling_to_a_numeric_group_reports_error_in_status() {
        let mut app = App::new(&args()).unwrap();
        // Pricing columns: loan_id, race, sex, rate, apr, loan_amount.
        app.handle_key(KeyCode::Right); // race -> sex
        assert_eq!(app.tabs[0].group.as_deref(), Some("sex"));
        assert!(app.tabs[0].run.is_some());

        app.handle_key(KeyCode::Right); // sex -> rate
        assert_eq!(app.tabs[0].group.as_deref(), Some("rate"));
        assert!(app.tabs[0].run.is_none());
        assert!(app.status.starts_with("error:"));
        assert!(app.status.contains("not categorical"));

        app.handle_key(KeyCode::Left);
        assert!(app.tabs[0].run.is_some());
        assert!(!app.status.starts_with("error:"));
    }

    #[test]
    fn down_selects_the_value_field() {
        let mut app = App::new(&args()).unwrap();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right); // rate -> apr
        assert_eq!(app.tabs[0].target.as_deref(), Some("apr"));
        assert!(app.status.contains("Price column: apr"));
    }

    #[test]
    fn reseed_changes_the_sample() {
        let mut app = App::new(&args()).unwrap();
        let before = app.tabs[0].dataset.as_ref().unwrap().rows.clone();
        app.handle_key(KeyCode::Char('r'));
        let after = &app.tabs[0].dataset.as_ref().unwrap().rows;
        assert_ne!(&before, after);
        assert_eq!(app.status, "Resampled (seed=6).");
    }

    #[test]
    fn renders_into_a_test_backend() {
        let mut app = App::new(&args()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        app.handle_key(KeyCode::Tab);
        terminal.draw(|f| app.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Chi-square Statistic"));
        assert!(text.contains("Credit Decision Testing"));
    }

    #[test]
    fn failed_anova_keeps_the_distribution_on_screen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.csv");
        std::fs::write(&path, "g,v\nA,1\nA,1\nB,2\nB,2\n").unwrap();
        let mut app = App::new(&TuiArgs {
            pricing_file: Some(path),
            ..args()
        })
        .unwrap();

        let Some(TabRun::Price(run)) = &app.tabs[0].run else {
            panic!("expected a price run");
        };
        assert_eq!(run.summaries.len(), 2);
        assert!(run.anova.is_none());
        assert!(app.status.starts_with("error: ANOVA failed"));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("ANOVA failed"));
        assert!(text.contains("Distribution of v by g"));
    }

    #[test]
    fn group_centers_are_spread_across_the_chart() {
        assert_eq!(group_center(0, 2, 21), 5);
        assert_eq!(group_center(1, 2, 21), 15);
    }
}
