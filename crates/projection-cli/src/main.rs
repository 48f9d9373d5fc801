mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calculators::{SipArgs, StepUpArgs, SwpArgs};

/// SIP, SWP and step-up SIP projections
#[derive(Parser)]
#[command(
    name = "projcalc",
    version,
    about = "SIP, SWP and step-up SIP projections",
    long_about = "A CLI for projecting systematic investment and withdrawal plans \
                  with decimal precision. Computes corpus growth, depletion horizons, \
                  CAGR and approximate XIRR."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Abbreviate money in table output (K, L, Cr)
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a fixed monthly SIP
    Sip(SipArgs),
    /// Simulate a systematic withdrawal plan
    Swp(SwpArgs),
    /// Project a SIP with a yearly step-up, compared with a flat SIP
    StepUpSip(StepUpArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Sip(args) => commands::calculators::run_sip(args),
        Commands::Swp(args) => commands::calculators::run_swp(args),
        Commands::StepUpSip(args) => commands::calculators::run_step_up_sip(args),
        Commands::Version => {
            println!("projcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, cli.compact);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
