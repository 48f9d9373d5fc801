use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ProjectionError;
use crate::types::{Money, Percent};
use crate::ProjectionResult;

pub const MONTHS_PER_YEAR: u32 = 12;

pub(crate) fn overflow(context: &str) -> ProjectionError {
    ProjectionError::NumericOverflow {
        context: context.into(),
    }
}

/// Monthly rate from an annual percentage: R / 100 / 12.
pub fn monthly_rate(annual_pct: Percent) -> Decimal {
    annual_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Decimal, n: u32) -> ProjectionResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| overflow("compound growth factor"))?;
    }
    Ok(result)
}

/// Table of growth factors where `table[k] = (1 + r)^k` for k in 0..=n.
pub fn growth_factors(rate: Decimal, n: u32) -> ProjectionResult<Vec<Decimal>> {
    let factor = Decimal::ONE + rate;
    let mut table = Vec::with_capacity(n as usize + 1);
    let mut current = Decimal::ONE;
    table.push(current);
    for _ in 0..n {
        current = current
            .checked_mul(factor)
            .ok_or_else(|| overflow("growth factor table"))?;
        table.push(current);
    }
    Ok(table)
}

/// Future value of an annuity-due: contributions at the start of each period.
///
/// FV = pmt * [((1+r)^n - 1) / r] * (1+r), or pmt * n when r is zero.
pub fn annuity_due_fv(pmt: Money, rate: Decimal, n: u32) -> ProjectionResult<Money> {
    if rate.is_zero() {
        return pmt
            .checked_mul(Decimal::from(n))
            .ok_or_else(|| overflow("annuity-due future value"));
    }
    let factor = compound(rate, n)?;
    (factor - Decimal::ONE)
        .checked_div(rate)
        .and_then(|annuity_factor| pmt.checked_mul(annuity_factor))
        .and_then(|v| v.checked_mul(Decimal::ONE + rate))
        .ok_or_else(|| overflow("annuity-due future value"))
}

/// Annualised growth `((end / start)^(1/years) - 1) * 100`.
///
/// Returns `None` when the result is undefined: non-positive start value or
/// horizon, a negative ratio, or a power outside the decimal range.
pub fn annualised_growth_pct(end: Money, start: Money, years: Decimal) -> Option<Percent> {
    if start <= Decimal::ZERO || years <= Decimal::ZERO {
        return None;
    }
    let ratio = end.checked_div(start)?;
    if ratio < Decimal::ZERO {
        return None;
    }
    let exponent = Decimal::ONE.checked_div(years)?;
    let growth = ratio.checked_powd(exponent)?;
    (growth - Decimal::ONE).checked_mul(dec!(100))
}
