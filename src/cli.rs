//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// compile_reports - compile bundle cleaning reports into final indices
///
/// Reads the bundle recognition results and applies every cleaning report
/// in the order given. Reports on the same bundle chain: each one selects
/// positions from the sequence left by the previous one.
///
/// Examples:
///   compile_reports --results results.json --cleaning_reports s1__AF_L_report.json --out_report out.json
///   compile_reports --results results.json --report AF_L=af_clean.json --out_report out.json
///   compile_reports --results results.json --cleaning_reports reports/*.json --dry-run
///   compile_reports --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Bundle recognition results (bundle name -> { "indices": [...] })
    #[arg(long, value_name = "FILE", required_unless_present = "init_config")]
    pub results: Option<PathBuf>,

    /// Cleaning reports named `<subject>__<bundle>_report.json`
    ///
    /// Applied in the order given. The bundle name is taken from the file name.
    #[arg(
        long = "cleaning_reports",
        visible_alias = "cleaning-reports",
        value_name = "FILE",
        num_args = 1..,
        required_unless_present_any = ["reports", "init_config"],
        conflicts_with = "reports"
    )]
    pub cleaning_reports: Vec<PathBuf>,

    /// Cleaning report with an explicit bundle name (repeatable)
    ///
    /// Example: --report AF_L=cleaning/af_left.json
    #[arg(long = "report", value_name = "BUNDLE=FILE", value_parser = parse_bundle_report)]
    pub reports: Vec<(String, PathBuf)>,

    /// Output file for the compiled bundle indices
    #[arg(
        long = "out_report",
        visible_alias = "out-report",
        value_name = "FILE",
        required_unless_present_any = ["dry_run", "init_config"]
    )]
    pub out_report: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .compile_reports.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "COMPILE_REPORTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Separator preceding the bundle name in report file names
    #[arg(long, value_name = "TOKEN")]
    pub separator: Option<String>,

    /// Suffix following the bundle name in report file names
    #[arg(long, value_name = "TOKEN")]
    pub suffix: Option<String>,

    /// Indentation width of the output JSON
    #[arg(long, value_name = "SPACES")]
    pub indent: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Load and compile everything, print the summary, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .compile_reports.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Parse a `BUNDLE=FILE` pair.
fn parse_bundle_report(value: &str) -> Result<(String, PathBuf), String> {
    let (bundle, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected BUNDLE=FILE, got '{}'", value))?;

    if bundle.is_empty() {
        return Err("bundle name must not be empty".to_string());
    }
    if path.is_empty() {
        return Err(format!("missing report path for bundle '{}'", bundle));
    }

    Ok((bundle.to_string(), PathBuf::from(path)))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.cleaning_reports.is_empty() && self.reports.is_empty() {
            return Err("At least one cleaning report is required".to_string());
        }

        if matches!(self.separator.as_deref(), Some("")) {
            return Err("Separator must not be empty".to_string());
        }
        if matches!(self.suffix.as_deref(), Some("")) {
            return Err("Suffix must not be empty".to_string());
        }

        if let Some(indent) = self.indent {
            if indent > 16 {
                return Err("Indent must be at most 16 spaces".to_string());
            }
        }

        if let (Some(results), Some(out)) = (&self.results, &self.out_report) {
            if results == out {
                return Err("Output file must differ from the results file".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
