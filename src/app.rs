//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the dataset source (file, URL, `.env` default, picker, sample)
//! - runs the price / credit pipelines
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CreditArgs, OutputArgs, PriceArgs, SampleArgs, SourceArgs};
use crate::config::EnvConfig;
use crate::domain::{Analysis, CreditConfig, DataSource, OutputConfig, PriceConfig, SampleSpec};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fairlend` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fairlend` and `fairlend --seed 7` to behave like `fairlend tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_tracing(cli.debug, log_target(&cli.command))?;

    match cli.command {
        Command::Price(args) => handle_price(args),
        Command::Credit(args) => handle_credit(args),
        Command::Sample(args) => handle_sample(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

/// Debug log file used while the dashboard owns the terminal.
pub const TUI_LOG_FILE: &str = "fairlend-debug.log";

/// Where `--debug` output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// The dashboard draws on the alternate screen, so its logs go to a file.
fn log_target(command: &Command) -> LogTarget {
    match command {
        Command::Tui(_) => LogTarget::File(PathBuf::from(TUI_LOG_FILE)),
        _ => LogTarget::Stderr,
    }
}

/// Install a `fmt` subscriber when `--debug` is given.
fn init_tracing(debug: bool, target: LogTarget) -> Result<(), AppError> {
    if !debug {
        return Ok(());
    }

    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into());
    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = std::fs::File::create(&path)
                .map_err(|e| AppError::usage(format!("Failed to create log file '{}': {e}", path.display())))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
    }
    Ok(())
}

fn handle_price(args: PriceArgs) -> Result<(), AppError> {
    let config = price_config_from_args(&args, &EnvConfig::load())?;
    let (dataset, run) = pipeline::run_price(&config)?;

    println!("{}", crate::report::format_price_report(&dataset, &run, &config.output));

    if config.output.plot {
        let plot = crate::plot::render_box_plot(
            &run.summaries,
            &run.value_column,
            &run.group_column,
            config.output.plot_width,
            config.output.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.output.export {
        crate::io::export::write_result_json(path, &dataset, &config, &run)?;
        println!("Wrote {}", path.display());
    }

    // The report already shows the failure; the exit code still reflects it.
    match run.anova_error {
        Some(msg) => Err(AppError::runtime(msg)),
        None => Ok(()),
    }
}

fn handle_credit(args: CreditArgs) -> Result<(), AppError> {
    let config = credit_config_from_args(&args, &EnvConfig::load())?;
    let (dataset, run) = pipeline::run_credit(&config)?;

    println!("{}", crate::report::format_credit_report(&dataset, &run, &config.output));

    if config.output.plot {
        let plot = crate::plot::render_stacked_bars(
            &run.rates,
            &run.outcome_column,
            &run.group_column,
            config.output.plot_width,
            config.output.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.output.export {
        crate::io::export::write_result_json(path, &dataset, &config, &run)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    std::fs::create_dir_all(&args.out)
        .map_err(|e| AppError::usage(format!("Failed to create '{}': {e}", args.out.display())))?;

    for (analysis, gap) in [
        (Analysis::Pricing, args.price_gap),
        (Analysis::Underwriting, args.approval_gap),
    ] {
        let spec = SampleSpec {
            seed: args.seed,
            rows: args.rows,
            gap,
        };
        let dataset = crate::data::sample::generate(analysis, &spec)?;
        let path = args.out.join(analysis.sample_file_name());
        crate::io::export::write_dataset_csv(&path, &dataset)?;
        println!("Wrote {} ({} rows)", path.display(), dataset.n_rows());
    }
    Ok(())
}

pub fn price_config_from_args(args: &PriceArgs, env: &EnvConfig) -> Result<PriceConfig, AppError> {
    Ok(PriceConfig {
        source: source_from_args(Analysis::Pricing, &args.source, args.price_gap, env)?,
        group_column: args.group.clone(),
        value_column: args.value.clone(),
        output: output_from_args(&args.output),
    })
}

pub fn credit_config_from_args(args: &CreditArgs, env: &EnvConfig) -> Result<CreditConfig, AppError> {
    Ok(CreditConfig {
        source: source_from_args(Analysis::Underwriting, &args.source, args.approval_gap, env)?,
        group_column: args.group.clone(),
        outcome_column: args.outcome.clone(),
        output: output_from_args(&args.output),
    })
}

/// Resolve source flags into a `DataSource`. No flag means the synthetic sample.
fn source_from_args(
    analysis: Analysis,
    args: &SourceArgs,
    gap: f64,
    env: &EnvConfig,
) -> Result<DataSource, AppError> {
    if let Some(path) = &args.file {
        let path = crate::cli::picker::validate_csv_path(path)?;
        return Ok(DataSource::File(path));
    }
    if let Some(url) = &args.url {
        return Ok(DataSource::Url(url.clone()));
    }
    if args.use_default {
        return Ok(DataSource::Url(env.default_url(analysis)?.to_string()));
    }
    if args.pick {
        let path: PathBuf = crate::cli::picker::prompt_for_csv_path(analysis)?;
        return Ok(DataSource::File(path));
    }
    Ok(DataSource::Sample(SampleSpec {
        seed: args.seed,
        rows: args.rows,
        gap,
    }))
}

fn output_from_args(args: &OutputArgs) -> OutputConfig {
    OutputConfig {
        preview_rows: args.preview,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        alpha: args.alpha,
        export: args.export.clone(),
    }
}

/// Subcommand names clap knows about (plus its generated `help`).
const SUBCOMMANDS: [&str; 5] = ["price", "credit", "sample", "tui", "help"];

/// Rewrite argv so `fairlend` defaults to `fairlend tui`.
///
/// Rules:
/// - `fairlend`                      -> `fairlend tui`
/// - `fairlend --seed 7 ...`         -> `fairlend tui --seed 7 ...`
/// - `fairlend --debug price ...`    -> unchanged (global flag before a subcommand)
/// - `fairlend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1) else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version");
    if is_top_level_help_or_version {
        return argv;
    }

    let has_subcommand = argv[1..].iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));
    if has_subcommand {
        return argv;
    }

    // Only flags (and their values): treat them as "tui flags".
    argv.insert(1, "tui".to_string());
    argv
}
