use log::{debug, trace};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calculators::{require_non_negative, require_rate_above_total_loss};
use crate::time_value::{annualised_growth_pct, monthly_rate, overflow, MONTHS_PER_YEAR};
use crate::types::{round_money, round_pct, with_metadata, ComputationOutput, Money, Percent};
use crate::ProjectionResult;

/// Simulation horizon: 50 years of monthly withdrawals.
pub const MAX_SWP_MONTHS: u32 = 600;

/// Annual withdrawal rate of the 4% rule.
pub const SAFE_WITHDRAWAL_RATE: Decimal = dec!(0.04);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a systematic withdrawal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwpInput {
    pub initial_investment: Money,
    pub monthly_withdrawal: Money,
    pub annual_return_rate_pct: Percent,
}

/// Output of `compute_swp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwpOutput {
    pub total_withdrawals: Money,
    pub remaining_value: Money,
    pub months_lasted: u32,
    pub years_lasted: Decimal,
    /// True only when the corpus is still positive after the full horizon.
    pub is_sustainable: bool,
    pub cagr_pct: Percent,
    pub xirr_pct: Percent,
    pub safe_monthly_withdrawal: Money,
    pub annual_withdrawal_rate_pct: Percent,
    pub year_by_year: Vec<SwpYear>,
}

/// One simulated year; the final row may cover fewer than 12 months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwpYear {
    pub year: u32,
    pub opening_balance: Money,
    pub growth: Money,
    pub withdrawals: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Close out a plan year. Withdrawals are taken as the difference of rounded
/// cumulative totals so the rows add up to the reported total to the cent.
fn year_row(
    year: u32,
    opening_balance: Money,
    withdrawn_before: Money,
    withdrawn_to_date: Money,
    closing: Decimal,
) -> ProjectionResult<SwpYear> {
    let withdrawals = withdrawn_to_date - withdrawn_before;
    let closing_balance = round_money(closing);
    let growth = (closing_balance - opening_balance)
        .checked_add(withdrawals)
        .ok_or_else(|| overflow("SWP yearly growth"))?;
    Ok(SwpYear {
        year,
        opening_balance,
        growth,
        withdrawals,
        closing_balance,
    })
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate monthly withdrawals from a corpus until it is depleted or the
/// 50-year horizon is reached.
///
/// Each month the corpus first earns its monthly return, then the
/// withdrawal is taken. When the balance cannot cover a full withdrawal the
/// remainder is paid out as a final partial withdrawal and the plan ends.
pub fn compute_swp(input: &SwpInput) -> ProjectionResult<ComputationOutput<SwpOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // --- Validation ---
    require_non_negative("initial_investment", input.initial_investment)?;
    require_non_negative("monthly_withdrawal", input.monthly_withdrawal)?;
    require_rate_above_total_loss("annual_return_rate_pct", input.annual_return_rate_pct)?;

    let rate = monthly_rate(input.annual_return_rate_pct);
    let growth_factor = Decimal::ONE + rate;
    let withdrawal = input.monthly_withdrawal;

    let safe_monthly_withdrawal = round_money(
        input.initial_investment * SAFE_WITHDRAWAL_RATE / Decimal::from(MONTHS_PER_YEAR),
    );
    if withdrawal > safe_monthly_withdrawal {
        warnings.push(format!(
            "Monthly withdrawal of {} exceeds the 4% rule guideline of {}",
            withdrawal, safe_monthly_withdrawal
        ));
    }
    let annual_withdrawal_rate_pct = if input.initial_investment > Decimal::ZERO {
        let rate_pct = withdrawal
            .checked_mul(Decimal::from(MONTHS_PER_YEAR))
            .and_then(|annual| annual.checked_div(input.initial_investment))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| overflow("SWP annual withdrawal rate"))?;
        round_pct(rate_pct)
    } else {
        Decimal::ZERO
    };

    // ===================================================================
    // Month-by-month simulation
    // ===================================================================
    let mut value = input.initial_investment;
    let mut months: u32 = 0;
    let mut total_withdrawals = Decimal::ZERO;

    let mut year_by_year: Vec<SwpYear> = Vec::new();
    let mut year_opening = round_money(value);
    let mut withdrawn_before = Decimal::ZERO;

    while value > Decimal::ZERO && months < MAX_SWP_MONTHS {
        value = value
            .checked_mul(growth_factor)
            .ok_or_else(|| overflow("SWP corpus growth"))?;

        let paid = if value >= withdrawal {
            withdrawal
        } else {
            // Final partial withdrawal empties the corpus
            value
        };
        value -= paid;
        total_withdrawals = total_withdrawals
            .checked_add(paid)
            .ok_or_else(|| overflow("SWP total withdrawals"))?;
        months += 1;

        if months % MONTHS_PER_YEAR == 0 {
            let withdrawn_to_date = round_money(total_withdrawals);
            let row = year_row(
                months / MONTHS_PER_YEAR,
                year_opening,
                withdrawn_before,
                withdrawn_to_date,
                value,
            )?;
            year_opening = row.closing_balance;
            withdrawn_before = withdrawn_to_date;
            year_by_year.push(row);
        }
    }
    if months % MONTHS_PER_YEAR != 0 {
        year_by_year.push(year_row(
            months / MONTHS_PER_YEAR + 1,
            year_opening,
            withdrawn_before,
            round_money(total_withdrawals),
            value,
        )?);
    }

    trace!(
        "SWP loop exited after {} months with remaining value {}",
        months,
        value
    );

    let is_sustainable = months >= MAX_SWP_MONTHS && value > Decimal::ZERO;
    let years_lasted = Decimal::from(months) / Decimal::from(MONTHS_PER_YEAR);

    if !is_sustainable {
        warnings.push(format!(
            "Corpus depleted after {} months ({} years)",
            months,
            years_lasted.round_dp(1)
        ));
    }

    // ===================================================================
    // Derived rates
    // ===================================================================
    let cagr_pct = if is_sustainable {
        input.annual_return_rate_pct
    } else {
        let paid_out = value
            .checked_add(total_withdrawals)
            .ok_or_else(|| overflow("SWP paid-out value"))?;
        match annualised_growth_pct(paid_out, input.initial_investment, years_lasted) {
            Some(cagr) => round_pct(cagr),
            None => {
                debug!(
                    "SWP CAGR undefined (initial={}, months={}); using 0",
                    input.initial_investment, months
                );
                warnings.push("CAGR is undefined for this plan; reported as 0".into());
                Decimal::ZERO
            }
        }
    };

    let linear_xirr = if input.initial_investment > Decimal::ZERO && months > 0 {
        total_withdrawals
            .checked_div(input.initial_investment)
            .and_then(|multiple| (multiple - Decimal::ONE).checked_div(years_lasted))
            .and_then(|per_year| per_year.checked_mul(dec!(100)))
    } else {
        None
    };
    let xirr_pct = if is_sustainable {
        input.annual_return_rate_pct
    } else if let Some(xirr) = linear_xirr {
        round_pct(xirr)
    } else {
        debug!(
            "SWP XIRR undefined (initial={}, months={}); using 0",
            input.initial_investment, months
        );
        warnings.push("XIRR is undefined for this plan; reported as 0".into());
        Decimal::ZERO
    };

    let output = SwpOutput {
        total_withdrawals: round_money(total_withdrawals),
        remaining_value: round_money(value),
        months_lasted: months,
        years_lasted: round_pct(years_lasted),
        is_sustainable,
        cagr_pct,
        xirr_pct,
        safe_monthly_withdrawal,
        annual_withdrawal_rate_pct,
        year_by_year,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "SWP depletion simulation (monthly growth then withdrawal, 50-year cap)",
        &serde_json::json!({
            "initial_investment": input.initial_investment.to_string(),
            "monthly_withdrawal": input.monthly_withdrawal.to_string(),
            "annual_return_rate_pct": input.annual_return_rate_pct.to_string(),
            "monthly_rate": rate.to_string(),
            "max_months": MAX_SWP_MONTHS,
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn swp(initial: Decimal, withdrawal: Decimal, rate: Decimal) -> SwpOutput {
        compute_swp(&SwpInput {
            initial_investment: initial,
            monthly_withdrawal: withdrawal,
            annual_return_rate_pct: rate,
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_fast_depletion_at_zero_rate() {
        let out = swp(dec!(100000), dec!(50000), Decimal::ZERO);

        assert!(!out.is_sustainable);
        assert_eq!(out.months_lasted, 2);
        assert_eq!(out.remaining_value, Decimal::ZERO);
        assert_eq!(out.total_withdrawals, dec!(100000));
        // Everything returned, nothing earned
        assert_eq!(out.cagr_pct, Decimal::ZERO);
        assert_eq!(out.xirr_pct, Decimal::ZERO);
    }

    #[test]
    fn test_large_corpus_is_sustainable() {
        let out = swp(dec!(10000000), dec!(1000), dec!(10));

        assert!(out.is_sustainable);
        assert_eq!(out.months_lasted, MAX_SWP_MONTHS);
        assert_eq!(out.years_lasted, dec!(50));
        assert_eq!(out.cagr_pct, dec!(10));
        assert_eq!(out.xirr_pct, dec!(10));
        assert!(out.remaining_value > dec!(10000000));
    }

    #[test]
    fn test_partial_final_withdrawal() {
        let out = swp(dec!(2500), dec!(1000), Decimal::ZERO);

        assert!(!out.is_sustainable);
        assert_eq!(out.months_lasted, 3);
        assert_eq!(out.total_withdrawals, dec!(2500));
        assert_eq!(out.remaining_value, Decimal::ZERO);
    }

    #[test]
    fn test_depletion_with_growth() {
        let out = swp(dec!(1000000), dec!(15000), dec!(8));

        assert!(!out.is_sustainable);
        assert!(
            out.months_lasted > 80 && out.months_lasted < 100,
            "months={}",
            out.months_lasted
        );
        // Growth lets the plan pay out more than the initial corpus
        assert!(out.total_withdrawals > dec!(1000000));
        assert!(out.cagr_pct > Decimal::ZERO && out.cagr_pct < dec!(8));
        assert!(out.xirr_pct > Decimal::ZERO);
    }

    #[test]
    fn test_survives_exactly_to_cap() {
        let out = swp(dec!(600001), dec!(1000), Decimal::ZERO);

        assert!(out.is_sustainable);
        assert_eq!(out.months_lasted, 600);
        assert_eq!(out.remaining_value, dec!(1));
    }

    #[test]
    fn test_reaches_zero_at_month_600_is_not_sustainable() {
        let out = swp(dec!(600000), dec!(1000), Decimal::ZERO);

        assert!(!out.is_sustainable);
        assert_eq!(out.months_lasted, 600);
        assert_eq!(out.remaining_value, Decimal::ZERO);
    }

    #[test]
    fn test_partial_withdrawal_in_month_600_is_not_sustainable() {
        let out = swp(dec!(599500), dec!(1000), Decimal::ZERO);

        assert!(!out.is_sustainable);
        assert_eq!(out.months_lasted, 600);
        assert_eq!(out.total_withdrawals, dec!(599500));
    }

    #[test]
    fn test_zero_corpus_falls_back() {
        let result = compute_swp(&SwpInput {
            initial_investment: Decimal::ZERO,
            monthly_withdrawal: dec!(1000),
            annual_return_rate_pct: dec!(10),
        })
        .unwrap();
        let out = &result.result;

        assert_eq!(out.months_lasted, 0);
        assert!(!out.is_sustainable);
        assert_eq!(out.cagr_pct, Decimal::ZERO);
        assert_eq!(out.xirr_pct, Decimal::ZERO);
        assert_eq!(out.annual_withdrawal_rate_pct, Decimal::ZERO);
        assert!(out.year_by_year.is_empty());
        assert!(result.warnings.iter().any(|w| w.contains("CAGR")));
    }

    #[test]
    fn test_four_percent_rule_warning() {
        let result = compute_swp(&SwpInput {
            initial_investment: dec!(1000000),
            monthly_withdrawal: dec!(8000),
            annual_return_rate_pct: dec!(10),
        })
        .unwrap();

        assert_eq!(result.result.safe_monthly_withdrawal, dec!(3333.33));
        assert_eq!(result.result.annual_withdrawal_rate_pct, dec!(9.6));
        assert!(result.result.is_sustainable);
        assert!(result.warnings.iter().any(|w| w.contains("4% rule")));
    }

    #[test]
    fn test_year_rows_reconcile() {
        let out = swp(dec!(1000000), dec!(15000), dec!(8));

        let expected_rows = (out.months_lasted + 11) / 12;
        assert_eq!(out.year_by_year.len() as u32, expected_rows);
        assert_eq!(out.year_by_year[0].opening_balance, dec!(1000000));

        for pair in out.year_by_year.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
        }
        for row in &out.year_by_year {
            assert_eq!(
                row.opening_balance + row.growth - row.withdrawals,
                row.closing_balance
            );
        }

        let summed: Decimal = out.year_by_year.iter().map(|r| r.withdrawals).sum();
        assert_eq!(summed, out.total_withdrawals);
        assert_eq!(out.year_by_year.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_negative_withdrawal_rejected() {
        let result = compute_swp(&SwpInput {
            initial_investment: dec!(1000),
            monthly_withdrawal: dec!(-1),
            annual_return_rate_pct: dec!(10),
        });
        assert!(result.is_err());
    }
}
