use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calculators::{require_horizon, require_non_negative, require_rate_above_total_loss};
use crate::time_value::{
    annualised_growth_pct, annuity_due_fv, monthly_rate, overflow, MONTHS_PER_YEAR,
};
use crate::types::{round_money, round_pct, with_metadata, ComputationOutput, Money, Percent};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a systematic investment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_investment: Money,
    pub annual_return_rate_pct: Percent,
    pub years: u32,
}

/// Output of `compute_sip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipOutput {
    pub invested_amount: Money,
    pub estimated_returns: Money,
    pub total_value: Money,
    pub cagr_pct: Percent,
    /// Equal to the expected annual return; no money-weighted solve is done.
    pub xirr_pct: Percent,
    pub absolute_return_pct: Percent,
    pub year_by_year: Vec<SipYear>,
}

/// Corpus position at the end of a plan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipYear {
    pub year: u32,
    pub invested_to_date: Money,
    pub value: Money,
    pub returns_to_date: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project the future value of a fixed monthly SIP.
///
/// Contributions are made at the start of each month and compound
/// immediately (annuity-due), so the first instalment earns a full
/// month of return.
pub fn compute_sip(input: &SipInput) -> ProjectionResult<ComputationOutput<SipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    require_non_negative("monthly_investment", input.monthly_investment)?;
    require_rate_above_total_loss("annual_return_rate_pct", input.annual_return_rate_pct)?;
    require_horizon("years", input.years)?;

    let total_months = input.years * MONTHS_PER_YEAR;
    let rate = monthly_rate(input.annual_return_rate_pct);

    if input.years == 0 {
        warnings.push("Zero-year horizon: nothing is invested".into());
    }
    if rate.is_zero() {
        warnings.push("Zero expected return: corpus equals total contributions".into());
    } else if rate < Decimal::ZERO {
        warnings.push("Negative expected return: corpus ends below total contributions".into());
    }

    let invested = input
        .monthly_investment
        .checked_mul(Decimal::from(total_months))
        .ok_or_else(|| overflow("SIP invested amount"))?;
    let future_value = annuity_due_fv(input.monthly_investment, rate, total_months)?;

    let invested_amount = round_money(invested);
    let total_value = round_money(future_value);
    let estimated_returns = total_value - invested_amount;

    let cagr_pct = match annualised_growth_pct(future_value, invested, Decimal::from(input.years))
    {
        Some(cagr) => round_pct(cagr),
        None => {
            debug!(
                "SIP CAGR undefined (invested={}, value={}, years={}); using 0",
                invested, future_value, input.years
            );
            warnings.push("CAGR is undefined for this plan; reported as 0".into());
            Decimal::ZERO
        }
    };

    let absolute_return_pct = if invested_amount > Decimal::ZERO {
        estimated_returns
            .checked_div(invested_amount)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .map(round_pct)
            .ok_or_else(|| overflow("SIP absolute return"))?
    } else {
        Decimal::ZERO
    };

    // ===================================================================
    // Year-by-year schedule
    // ===================================================================
    let mut year_by_year: Vec<SipYear> = Vec::with_capacity(input.years as usize);
    for year in 1..=input.years {
        let months = year * MONTHS_PER_YEAR;
        let invested_to_date = input
            .monthly_investment
            .checked_mul(Decimal::from(months))
            .map(round_money)
            .ok_or_else(|| overflow("SIP invested to date"))?;
        let value = round_money(annuity_due_fv(input.monthly_investment, rate, months)?);
        year_by_year.push(SipYear {
            year,
            invested_to_date,
            value,
            returns_to_date: value - invested_to_date,
        });
    }

    let output = SipOutput {
        invested_amount,
        estimated_returns,
        total_value,
        cagr_pct,
        xirr_pct: input.annual_return_rate_pct,
        absolute_return_pct,
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "SIP future value (annuity-due, monthly compounding)",
        &serde_json::json!({
            "monthly_investment": input.monthly_investment.to_string(),
            "annual_return_rate_pct": input.annual_return_rate_pct.to_string(),
            "years": input.years,
            "total_months": total_months,
            "monthly_rate": rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
