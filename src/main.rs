//! qpcr-scurve - qPCR S-curve analysis CLI
//!
//! Reads a plate as JSON (`{"A1": {"cycles": [...], "rfu": [...]}, ...}`),
//! fits and classifies every well, and writes the batch report.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a plate, report to stdout
//! qpcr-scurve analyze --input plate.json
//!
//! # Stricter screening, CSV table alongside the JSON report
//! qpcr-scurve analyze --input plate.json --min-snr 5 --csv results.csv
//!
//! # Check an upload without analyzing it
//! qpcr-scurve validate --input plate.json
//!
//! # Print the effective configuration
//! qpcr-scurve config
//! ```
//!
//! # Environment Variables
//!
//! - `QPCR_CONFIG`: Path to a TOML configuration file
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qpcr_scurve::{process_wells, validate_wells, AnalysisConfig, Plate, QualityOverrides};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "qpcr-scurve")]
#[command(about = "qPCR amplification curve fitting and S-curve classification")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML configuration file (overrides QPCR_CONFIG and ./qpcr_config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Fit and classify every well on a plate
    Analyze {
        /// Plate JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a flat per-well CSV table
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Analyze wells one at a time instead of on the thread pool
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Check a plate upload for structural problems
    Validate {
        /// Plate JSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Per-run threshold overrides.
#[derive(clap::Args, Debug, Default)]
struct OverrideArgs {
    /// Earliest acceptable amplification start cycle
    #[arg(long)]
    min_start_cycle: Option<f64>,

    /// Minimum baseline-corrected amplitude (RFU)
    #[arg(long)]
    min_amplitude: Option<f64>,

    /// Minimum plateau level (RFU)
    #[arg(long)]
    min_plateau_rfu: Option<f64>,

    /// Minimum signal-to-noise ratio
    #[arg(long)]
    min_snr: Option<f64>,

    /// Minimum per-cycle growth (RFU)
    #[arg(long)]
    min_growth_rate: Option<f64>,

    /// R² threshold for runs with 20 or more points
    #[arg(long)]
    r2_threshold: Option<f64>,

    /// R² threshold for shorter runs
    #[arg(long)]
    r2_threshold_short: Option<f64>,

    /// Minimum fitted steepness
    #[arg(long)]
    min_steepness: Option<f64>,
}

impl From<OverrideArgs> for QualityOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            min_start_cycle: args.min_start_cycle,
            min_amplitude: args.min_amplitude,
            min_plateau_rfu: args.min_plateau_rfu,
            min_snr: args.min_snr,
            min_growth_rate: args.min_growth_rate,
            r2_threshold_long_run: args.r2_threshold,
            r2_threshold_short_run: args.r2_threshold_short,
            min_steepness: args.min_steepness,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(p) => AnalysisConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display()))?,
        None => AnalysisConfig::load(),
    };
    Ok(config)
}

fn read_plate(path: &Path) -> Result<Plate> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse plate JSON from {}", path.display()))
}

/// Open `path` for writing, or stdout when absent.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Failed to create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_analyze(
    config: AnalysisConfig,
    input: &Path,
    output: Option<&Path>,
    csv: Option<&Path>,
    sequential: bool,
    overrides: QualityOverrides,
) -> Result<()> {
    let mut config = config.with_overrides(&overrides);
    if sequential {
        config.batch.parallel = false;
    }
    config
        .validate()
        .context("Configuration is invalid after applying overrides")?;

    let plate = read_plate(input)?;
    let validation = validate_wells(&plate);
    for w in &validation.warnings {
        warn!("{}", w);
    }

    let processed = process_wells(&plate, &config)?;
    let summary = &processed.report.summary;
    info!(
        wells = summary.total_wells,
        good = summary.good_curves_count,
        "Analysis finished: {:.1}% good curves",
        summary.success_rate_percent
    );

    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &processed).context("Failed to write report")?;
    writeln!(writer)?;
    writer.flush()?;

    if let Some(csv_path) = csv {
        let file = File::create(csv_path)
            .with_context(|| format!("Failed to create {}", csv_path.display()))?;
        qpcr_scurve::export::write_csv(&processed.report, BufWriter::new(file))
            .with_context(|| format!("Failed to write CSV to {}", csv_path.display()))?;
        info!(path = %csv_path.display(), "CSV results written");
    }

    Ok(())
}

fn run_validate(input: &Path) -> Result<()> {
    let plate = read_plate(input)?;
    let report = validate_wells(&plate);

    let mut out = io::stdout().lock();
    for e in &report.errors {
        writeln!(out, "ERROR   {e}")?;
    }
    for w in &report.warnings {
        writeln!(out, "WARNING {w}")?;
    }
    writeln!(
        out,
        "{} wells, {} errors, {} warnings",
        plate.len(),
        report.errors.len(),
        report.warnings.len()
    )?;

    if !report.is_valid() {
        bail!("Upload failed validation");
    }
    Ok(())
}

fn run_config(config: &AnalysisConfig, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            config.save_to_file(path)?;
            info!(path = %path.display(), "Configuration written");
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(args.config.as_deref())?;

    match args.command {
        SubCommand::Analyze {
            input,
            output,
            csv,
            sequential,
            overrides,
        } => run_analyze(
            config,
            &input,
            output.as_deref(),
            csv.as_deref(),
            sequential,
            overrides.into(),
        ),
        SubCommand::Validate { input } => run_validate(&input),
        SubCommand::Config { output } => run_config(&config, output.as_deref()),
    }
}
