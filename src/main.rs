//! compile_reports - bundle cleaning report compiler
//!
//! Combines the bundle recognition results with the per-bundle cleaning
//! reports and writes the indices that survived every cleaning step.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any failure (arguments, config, inputs, filtering, output)

mod aggregator;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod naming;
mod report;

use aggregator::IndexAggregator;
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use models::BundleReport;
use naming::ReportNaming;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Start logging before the config is read so its warnings are shown
    let raise_to_debug = init_logging(&args);

    let config = match load_config(&args, Path::new(DEFAULT_CONFIG_FILE)) {
        Ok((config, fallback)) => {
            if let Some(reason) = fallback {
                warn!("{}", reason);
            }
            config
        }
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if config.general.verbose && !args.quiet && !args.verbose {
        raise_to_debug();
    }

    info!("compile_reports v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, &config) {
        error!("Compilation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .compile_reports.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` directives, when set, refine the level chosen here. The
/// returned closure switches the filter to DEBUG, for `verbose = true` in the
/// config file, which is only known once logging is already running.
fn init_logging(args: &Args) -> impl Fn() {
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(args.log_level()))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter_reloading();
    let handle = builder.reload_handle();

    if let Err(e) = tracing::subscriber::set_global_default(builder.finish()) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }

    move || {
        if let Err(e) = handle.reload(log_filter(tracing::Level::DEBUG)) {
            eprintln!("Warning: failed to raise log level: {}", e);
        }
    }
}

fn log_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// An unusable default file falls back to the defaults; the second value
/// says why, for the caller to log.
fn load_config(args: &Args, default_path: &Path) -> Result<(Config, Option<String>)> {
    let mut fallback = None;
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => match Config::load_default(default_path) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                fallback = Some(format!(
                    "Failed to load {}: {:#}; using defaults",
                    default_path.display(),
                    e
                ));
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    Ok((config, fallback))
}

/// Load every input, compile, then write the output.
///
/// All inputs are validated before filtering starts, and the output is only
/// written once every report has been applied.
fn run(args: &Args, config: &Config) -> Result<()> {
    let results_path = args
        .results
        .as_deref()
        .context("--results is required")?;

    let base = loader::load_results(results_path)?;
    if base.is_empty() {
        warn!("{} contains no bundles", results_path.display());
    }
    info!(
        "Loaded {} bundles from {}",
        base.len(),
        results_path.display()
    );

    let reports = load_reports(args, config)?;
    info!("Loaded {} cleaning reports", reports.len());

    let mut aggregator = IndexAggregator::new(base);
    aggregator.apply_all(&reports)?;

    if !args.quiet {
        println!("{}", report::render_summary(&aggregator.summary()));
    }

    if args.dry_run {
        info!("Dry run: no output written");
        return Ok(());
    }

    let out_path = args
        .out_report
        .as_deref()
        .context("--out_report is required")?;

    let compiled = aggregator.finish();
    report::write_report(&compiled, out_path, config.output.indent)?;
    info!("Compiled report saved to {}", out_path.display());

    Ok(())
}

fn load_reports(args: &Args, config: &Config) -> Result<Vec<BundleReport>> {
    if !args.reports.is_empty() {
        return Ok(loader::load_explicit_reports(&args.reports)?);
    }

    let naming = ReportNaming::from(&config.naming);
    Ok(loader::load_named_reports(&args.cleaning_reports, &naming)?)
}
