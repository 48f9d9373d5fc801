use clap::Args;
use log::debug;
use rust_decimal::Decimal;
use serde_json::Value;

use projection_core::calculators::sip::{self, SipInput};
use projection_core::calculators::step_up::{self, StepUpSipInput};
use projection_core::calculators::swp::{self, SwpInput};

use crate::input;

/// Arguments for a fixed monthly SIP projection
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly instalment
    #[arg(long)]
    pub monthly_investment: Option<Decimal>,

    /// Expected annual return in percent (e.g. 12 for 12%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for a systematic withdrawal plan
#[derive(Args)]
pub struct SwpArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Corpus at the start of withdrawals
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    /// Fixed monthly withdrawal
    #[arg(long)]
    pub monthly_withdrawal: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,
}

/// Arguments for a step-up SIP projection
#[derive(Args)]
pub struct StepUpArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly instalment in the first year
    #[arg(long)]
    pub monthly_investment: Option<Decimal>,

    /// Yearly increase of the instalment in percent
    #[arg(long, default_value = "10")]
    pub step_up: Decimal,

    /// Expected annual return in percent
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SipInput {
            monthly_investment: args
                .monthly_investment
                .ok_or("--monthly-investment is required (or provide --input)")?,
            annual_return_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };
    debug!("SIP input: {:?}", sip_input);

    let result = sip::compute_sip(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_swp(args: SwpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let swp_input: SwpInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SwpInput {
            initial_investment: args
                .initial_investment
                .ok_or("--initial-investment is required (or provide --input)")?,
            monthly_withdrawal: args
                .monthly_withdrawal
                .ok_or("--monthly-withdrawal is required (or provide --input)")?,
            annual_return_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        }
    };
    debug!("SWP input: {:?}", swp_input);

    let result = swp::compute_swp(&swp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_step_up_sip(args: StepUpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let step_up_input: StepUpSipInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        StepUpSipInput {
            initial_monthly_investment: args
                .monthly_investment
                .ok_or("--monthly-investment is required (or provide --input)")?,
            annual_step_up_pct: args.step_up,
            annual_return_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };
    debug!("Step-up SIP input: {:?}", step_up_input);

    let result = step_up::compute_step_up_sip(&step_up_input)?;
    Ok(serde_json::to_value(result)?)
}
