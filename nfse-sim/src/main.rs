use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nfse_core::{IssRate, WithholdingKind};
use tracing::debug;

use nfse_sim::commands::{self, WithholdingChoice};
use nfse_sim::config::SimConfig;
use nfse_sim::{logging, report};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Withholding simulator for NFS-e service invoices.
///
/// Computes ISS, IR, PIS, COFINS, CSLL and INSS withholdings and the net
/// value receivable for one invoice or a CSV batch.
#[derive(Debug, Parser)]
#[command(name = "nfse-sim", version, about, long_about = None)]
struct Cli {
    /// TOML file with default ISS rate, withholdings and log level.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (overridden by RUST_LOG).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a single invoice.
    Simulate(SimulateArgs),

    /// Simulate every invoice in a CSV file.
    Batch(BatchArgs),

    /// Print the withholding rate table.
    Rates,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Gross service value, e.g. 10000.00 or "10.000,00".
    #[arg(short, long)]
    gross: String,

    /// ISS rate in percent: 2, 2.5, 3, 4 or 5.
    #[arg(short, long)]
    iss_rate: Option<IssRate>,

    /// Tax to withhold (repeatable or comma-separated): iss, ir, pis, cofins, csll, inss.
    #[arg(short, long = "withhold", value_delimiter = ',', conflicts_with_all = ["all", "no_withholding"])]
    withhold: Vec<WithholdingKind>,

    /// Withhold every tax.
    #[arg(long, conflicts_with = "no_withholding")]
    all: bool,

    /// Withhold nothing, ignoring configured defaults.
    #[arg(long)]
    no_withholding: bool,

    /// Print the rounded result as JSON.
    #[arg(long)]
    json: bool,
}

impl SimulateArgs {
    fn withholding_choice(&self) -> WithholdingChoice {
        if self.all {
            WithholdingChoice::All
        } else if self.no_withholding {
            WithholdingChoice::Nothing
        } else if !self.withhold.is_empty() {
            WithholdingChoice::Only(self.withhold.clone())
        } else {
            WithholdingChoice::Configured
        }
    }
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// CSV file with columns id, gross_value, iss_rate and optional flags.
    #[arg(short, long)]
    file: PathBuf,

    /// Where to write result rows; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SimConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    logging::init_logging(level)?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Simulate(args) => {
            let input = commands::simulation_input(
                &args.gross,
                args.iss_rate,
                &args.withholding_choice(),
                &config,
            )?;
            print!("{}", commands::simulate(&input, args.json)?);
        }
        Command::Batch(args) => {
            let summary = match &args.output {
                Some(path) => commands::batch_to_file(&args.file, path)?,
                None => commands::batch(&args.file, io::stdout().lock())?,
            };
            // Summary goes to stderr when results are streamed to stdout.
            let text = report::render_batch_summary(&summary);
            if args.output.is_some() {
                print!("{text}");
            } else {
                io::stderr().write_all(text.as_bytes())?;
            }
        }
        Command::Rates => print!("{}", commands::rates()),
    }

    Ok(())
}
