//! Synthetic qPCR Plate Simulation
//!
//! Generates seeded synthetic amplification plates for exercising the
//! analyzer. Scenarios cycle across the wells in row-major order:
//! - Clean late-rising positives
//! - Flat negatives
//! - Early-start curves
//! - Linear drift
//! - Heavily noisy amplification
//!
//! # Usage
//! ```bash
//! ./simulation --wells 96 --seed 7 > plate.json
//! qpcr-scurve analyze --input plate.json
//! ```

use clap::Parser;
use std::io::{self, Write};

use qpcr_scurve::synthetic::{synthetic_plate, Scenario, DEFAULT_CYCLES, PLATE_WELLS};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "qpcr-simulation")]
#[command(about = "Synthetic qPCR plate generator for qpcr-scurve testing")]
#[command(version = "1.0")]
struct Args {
    /// Number of wells (1-96)
    #[arg(short, long, default_value = "96", value_parser = clap::value_parser!(u32).range(1..=PLATE_WELLS as i64))]
    wells: u32,

    /// Cycles per run
    #[arg(short, long, default_value_t = DEFAULT_CYCLES as u32, value_parser = clap::value_parser!(u32).range(1..=100))]
    cycles: u32,

    /// Scenarios to cycle through (comma separated); all when omitted
    #[arg(long, value_delimiter = ',')]
    scenario: Vec<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn parse_scenario(name: &str) -> Option<Scenario> {
    Scenario::ALL.into_iter().find(|s| s.name() == name)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut scenarios = Vec::with_capacity(args.scenario.len());
    for name in &args.scenario {
        match parse_scenario(name.trim()) {
            Some(s) => scenarios.push(s),
            None => {
                let known: Vec<&str> = Scenario::ALL.iter().map(|s| s.name()).collect();
                return Err(format!("unknown scenario '{}' (expected one of: {})", name, known.join(", ")).into());
            }
        }
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    eprintln!(
        "Generating {} wells x {} cycles (seed {})",
        args.wells, args.cycles, seed
    );

    let plate = synthetic_plate(seed, args.wells as usize, args.cycles as usize, &scenarios);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &plate)?;
    } else {
        serde_json::to_writer(&mut out, &plate)?;
    }
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
