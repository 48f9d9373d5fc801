use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calculators::{require_horizon, require_non_negative, require_rate_above_total_loss};
use crate::time_value::{
    annualised_growth_pct, annuity_due_fv, growth_factors, monthly_rate, overflow,
    MONTHS_PER_YEAR,
};
use crate::types::{round_money, round_pct, with_metadata, ComputationOutput, Money, Percent};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a step-up SIP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepUpSipInput {
    pub initial_monthly_investment: Money,
    /// Yearly increase of the monthly instalment, in percent.
    pub annual_step_up_pct: Percent,
    pub annual_return_rate_pct: Percent,
    pub years: u32,
}

/// Output of `compute_step_up_sip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepUpSipOutput {
    pub total_investment: Money,
    pub estimated_returns: Money,
    pub maturity_value: Money,
    pub regular_sip_comparison_value: Money,
    pub regular_sip_investment: Money,
    pub additional_gain: Money,
    pub final_monthly_investment: Money,
    pub cagr_pct: Percent,
    pub xirr_pct: Percent,
    pub year_by_year: Vec<StepUpYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepUpYear {
    pub year: u32,
    pub monthly_investment: Money,
    pub invested_in_year: Money,
    pub cumulative_investment: Money,
    pub value: Money,
    pub regular_sip_value: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project a SIP whose monthly instalment grows by a fixed percentage at the
/// start of every plan year, and compare it with a flat SIP of the same
/// starting instalment.
pub fn compute_step_up_sip(
    input: &StepUpSipInput,
) -> ProjectionResult<ComputationOutput<StepUpSipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    require_non_negative("initial_monthly_investment", input.initial_monthly_investment)?;
    require_non_negative("annual_step_up_pct", input.annual_step_up_pct)?;
    require_rate_above_total_loss("annual_return_rate_pct", input.annual_return_rate_pct)?;
    require_horizon("years", input.years)?;

    let total_months = input.years * MONTHS_PER_YEAR;
    let rate = monthly_rate(input.annual_return_rate_pct);
    let step_up_factor = (input.annual_step_up_pct / dec!(100))
        .checked_add(Decimal::ONE)
        .ok_or_else(|| overflow("step-up factor"))?;

    if input.years == 0 {
        warnings.push("Zero-year horizon: nothing is invested".into());
    }
    if rate.is_zero() {
        warnings.push("Zero expected return: corpus equals total contributions".into());
    } else if rate < Decimal::ZERO {
        warnings.push("Negative expected return: corpus ends below total contributions".into());
    }

    // (1 + r)^k for every remaining-months count a contribution can see
    let factors = growth_factors(rate, total_months)?;

    let mut current_monthly = input.initial_monthly_investment;
    let mut total_investment = Decimal::ZERO;
    let mut maturity = Decimal::ZERO;

    let mut balance = Decimal::ZERO;
    let mut year_invested = Decimal::ZERO;
    let mut year_by_year: Vec<StepUpYear> = Vec::with_capacity(input.years as usize);

    for month in 1..=total_months {
        if month > 1 && (month - 1) % MONTHS_PER_YEAR == 0 {
            current_monthly = current_monthly
                .checked_mul(step_up_factor)
                .ok_or_else(|| overflow("step-up instalment"))?;
        }
        total_investment = total_investment
            .checked_add(current_monthly)
            .ok_or_else(|| overflow("step-up total investment"))?;
        year_invested = year_invested
            .checked_add(current_monthly)
            .ok_or_else(|| overflow("step-up yearly investment"))?;

        let remaining_months = total_months - month + 1;
        let contribution_fv = current_monthly
            .checked_mul(factors[remaining_months as usize])
            .ok_or_else(|| overflow("step-up contribution future value"))?;
        maturity = maturity
            .checked_add(contribution_fv)
            .ok_or_else(|| overflow("step-up maturity value"))?;

        balance = balance
            .checked_add(current_monthly)
            .and_then(|b| b.checked_mul(Decimal::ONE + rate))
            .ok_or_else(|| overflow("step-up running balance"))?;

        if month % MONTHS_PER_YEAR == 0 {
            year_by_year.push(StepUpYear {
                year: month / MONTHS_PER_YEAR,
                monthly_investment: round_money(current_monthly),
                invested_in_year: round_money(year_invested),
                cumulative_investment: round_money(total_investment),
                value: round_money(balance),
                regular_sip_value: round_money(annuity_due_fv(
                    input.initial_monthly_investment,
                    rate,
                    month,
                )?),
            });
            year_invested = Decimal::ZERO;
        }
    }

    let regular_sip_value =
        annuity_due_fv(input.initial_monthly_investment, rate, total_months)?;
    let regular_sip_investment = input
        .initial_monthly_investment
        .checked_mul(Decimal::from(total_months))
        .map(round_money)
        .ok_or_else(|| overflow("regular SIP investment"))?;

    let total_investment_rounded = round_money(total_investment);
    let maturity_value = round_money(maturity);
    let regular_sip_comparison_value = round_money(regular_sip_value);

    let cagr_pct =
        match annualised_growth_pct(maturity, total_investment, Decimal::from(input.years)) {
            Some(cagr) => round_pct(cagr),
            None => {
                debug!(
                    "Step-up CAGR undefined (invested={}, value={}, years={}); using 0",
                    total_investment, maturity, input.years
                );
                warnings.push("CAGR is undefined for this plan; reported as 0".into());
                Decimal::ZERO
            }
        };

    let xirr_pct = (input.annual_step_up_pct / dec!(200))
        .checked_add(Decimal::ONE)
        .and_then(|scale| input.annual_return_rate_pct.checked_mul(scale))
        .map(round_pct)
        .ok_or_else(|| overflow("step-up XIRR approximation"))?;
    if input.annual_step_up_pct > Decimal::ZERO {
        warnings.push(
            "XIRR is approximated as the expected return scaled by half the step-up".into(),
        );
    }

    let output = StepUpSipOutput {
        total_investment: total_investment_rounded,
        estimated_returns: maturity_value - total_investment_rounded,
        maturity_value,
        regular_sip_comparison_value,
        regular_sip_investment,
        additional_gain: maturity_value - regular_sip_comparison_value,
        final_monthly_investment: round_money(current_monthly),
        cagr_pct,
        xirr_pct,
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Step-up SIP (annual instalment escalation, per-contribution compounding)",
        &serde_json::json!({
            "initial_monthly_investment": input.initial_monthly_investment.to_string(),
            "annual_step_up_pct": input.annual_step_up_pct.to_string(),
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
