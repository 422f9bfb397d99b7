//! VIGIL Medication Safety Engine — Demo CLI
//!
//! Runs one or all of the three demo scenarios.  Each scenario uses real
//! VIGIL components (knowledge base, alert engine, acknowledgment ledger,
//! dosage calculator) wired together with fictional clinical data.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- safety-check
//!   cargo run -p demo -- preview
//!   cargo run -p demo -- dosage
//!
//! Pass `--formulary path/to/formulary.toml` to evaluate against a custom
//! knowledge base instead of the embedded default.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vigil_knowledge::KnowledgeBase;

mod sample_data;
mod scenarios;

use scenarios::{dosage, preview, safety_check};

// ── CLI definition ────────────────────────────────────────────────────────────

/// VIGIL — medication safety alerting and dosage decision demo.
///
/// Each subcommand runs one or all of the three clinical scenarios,
/// demonstrating alert generation, acknowledgment persistence, and
/// weight-based dose calculation.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VIGIL medication safety engine demo",
    long_about = "Runs VIGIL demo scenarios showing safety-alert generation,\n\
                  acknowledgment round trips, and weight-based dosage calculation."
)]
struct Cli {
    /// TOML formulary to load instead of the embedded default.
    #[arg(long, value_name = "PATH", global = true)]
    formulary: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: Medication Safety Sweep (alerts + acknowledgment).
    SafetyCheck,
    /// Scenario 2: Live Order Preview (editing exclusion, focused checks).
    Preview,
    /// Scenario 3: Weight-Based Dosage (pediatric capping, screening).
    Dosage,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; RUST_LOG=debug shows every generator decision.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    // One knowledge base, shared by every scenario.
    let kb = match &cli.formulary {
        Some(path) => match KnowledgeBase::from_file(path) {
            Ok(kb) => kb,
            Err(e) => {
                eprintln!("could not load formulary: {}", e);
                std::process::exit(1);
            }
        },
        None => KnowledgeBase::builtin(),
    };

    print_banner();

    let outcome = match cli.command {
        Command::RunAll => run_all(&kb),
        Command::SafetyCheck => safety_check::run_scenario(&kb),
        Command::Preview => preview::run_scenario(&kb),
        Command::Dosage => dosage::run_scenario(&kb),
    };

    if let Err(e) = outcome {
        eprintln!("scenario failed: {}", e);
        std::process::exit(1);
    }
    println!("Done.");
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all(kb: &KnowledgeBase) -> vigil_contracts::error::VigilResult<()> {
    safety_check::run_scenario(kb)?;
    preview::run_scenario(kb)?;
    dosage::run_scenario(kb)?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("VIGIL — Medication Safety Engine");
    println!("Clinical Reference Demo");
    println!("================================");
    println!();
    println!("Evaluation pipeline per medication set:");
    println!("  [1] Six rule generators: allergy, interaction, duplicate, dosage, age, contraindication");
    println!("  [2] Symmetric pair dedup — one alert per unordered medication pair");
    println!("  [3] Severity sort: critical < high < moderate < low < info");
    println!("  [4] Acknowledgment join from the per-patient ledger");
    println!();
}
