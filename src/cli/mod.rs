//! Command-line parsing for the fair-lending dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the statistics code.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "fairlend",
    version,
    about = "Fair-lending analysis: ANOVA price testing and chi-square credit decision testing"
)]
pub struct Cli {
    /// Log pipeline steps to stderr (`RUST_LOG` refines the filter).
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Test whether a price column differs across groups (one-way ANOVA).
    Price(PriceArgs),
    /// Test whether decision outcomes depend on a segment (chi-square).
    Credit(CreditArgs),
    /// Write the synthetic pricing and underwriting datasets as CSV.
    Sample(SampleArgs),
    /// Launch the interactive dashboard.
    ///
    /// Both analyses run through the same pipeline as `fairlend price` and
    /// `fairlend credit`, rendered with Ratatui.
    Tui(TuiArgs),
}

/// Where to load the dataset from. At most one of the source flags may be given;
/// with none, the synthetic sample is used.
#[derive(Debug, Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .args(["file", "url", "use_default", "sample", "pick"])
        .multiple(false)
))]
pub struct SourceArgs {
    /// Local CSV file.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// CSV over HTTP(S).
    #[arg(long)]
    pub url: Option<String>,

    /// Use the URL configured in the environment / `.env`.
    #[arg(long = "default")]
    pub use_default: bool,

    /// Use the seeded synthetic dataset.
    #[arg(long)]
    pub sample: bool,

    /// Pick a CSV from the current directory tree interactively.
    #[arg(long)]
    pub pick: bool,

    /// Random seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of synthetic rows.
    #[arg(short = 'n', long = "n", default_value_t = 500)]
    pub rows: usize,
}

/// Terminal output options shared by both analyses.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Rows shown in the data preview (0 hides it).
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Chart height (plot rows, shared evenly across groups).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Significance level for the verdict line.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Export the run (config + results) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `fairlend price`.
#[derive(Debug, Args, Clone)]
pub struct PriceArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Grouping (categorical) column. Defaults to the first categorical column.
    #[arg(short = 'g', long)]
    pub group: Option<String>,

    /// Price (numeric) column. Defaults to the first numeric column.
    #[arg(short = 'v', long)]
    pub value: Option<String>,

    /// Rate premium (percentage points) injected into the synthetic dataset.
    #[arg(long, default_value_t = 0.25)]
    pub price_gap: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `fairlend credit`.
#[derive(Debug, Args, Clone)]
pub struct CreditArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Segment column. Defaults to the first categorical column.
    #[arg(short = 'g', long)]
    pub group: Option<String>,

    /// Decision column. Defaults to the last categorical column.
    #[arg(short = 'o', long)]
    pub outcome: Option<String>,

    /// Approval-probability penalty injected into the synthetic dataset.
    #[arg(long, default_value_t = 0.10)]
    pub approval_gap: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `fairlend sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output directory (created if missing).
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(short = 'n', long = "n", default_value_t = 500)]
    pub rows: usize,

    #[arg(long, default_value_t = 0.25)]
    pub price_gap: f64,

    #[arg(long, default_value_t = 0.10)]
    pub approval_gap: f64,
}

/// Options for `fairlend tui`.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Pricing CSV (synthetic sample when omitted).
    #[arg(long, value_name = "CSV")]
    pub pricing_file: Option<PathBuf>,

    /// Underwriting CSV (synthetic sample when omitted).
    #[arg(long, value_name = "CSV")]
    pub uw_file: Option<PathBuf>,

    /// Initial seed for the synthetic datasets (`r` reseeds).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(short = 'n', long = "n", default_value_t = 500)]
    pub rows: usize,

    #[arg(long, default_value_t = 0.25)]
    pub price_gap: f64,

    #[arg(long, default_value_t = 0.10)]
    pub approval_gap: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_flags_parse() {
        let cli = Cli::parse_from([
            "fairlend", "price", "--file", "p.csv", "--group", "race", "--value", "apr", "--no-plot",
        ]);
        let Command::Price(args) = cli.command else {
            panic!("expected price");
        };
        assert_eq!(args.source.file, Some(PathBuf::from("p.csv")));
        assert_eq!(args.group.as_deref(), Some("race"));
        assert_eq!(args.value.as_deref(), Some("apr"));
        assert!(args.output.no_plot);
        assert_eq!(args.output.preview, 5);
    }

    #[test]
    fn source_flags_are_exclusive() {
        let res = Cli::try_parse_from(["fairlend", "credit", "--file", "u.csv", "--sample"]);
        assert!(res.is_err());
    }

    #[test]
    fn debug_is_global() {
        let cli = Cli::parse_from(["fairlend", "tui", "--debug"]);
        assert!(cli.debug);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
