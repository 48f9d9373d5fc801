#[cfg(feature = "sip")]
pub mod sip;

#[cfg(feature = "swp")]
pub mod swp;

#[cfg(feature = "step_up")]
pub mod step_up;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ProjectionError;
use crate::types::{Money, Percent};
use crate::ProjectionResult;

/// Longest horizon accepted by the accumulation calculators.
pub const MAX_PROJECTION_YEARS: u32 = 100;

pub(crate) fn require_non_negative(field: &str, value: Money) -> ProjectionResult<()> {
    if value < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: field.into(),
            reason: "must be >= 0".into(),
        });
    }
    Ok(())
}

pub(crate) fn require_rate_above_total_loss(field: &str, rate_pct: Percent) -> ProjectionResult<()> {
    if rate_pct <= dec!(-100) {
        return Err(ProjectionError::InvalidInput {
            field: field.into(),
            reason: "Annual return must be greater than -100%".into(),
        });
    }
    Ok(())
}

pub(crate) fn require_horizon(field: &str, years: u32) -> ProjectionResult<()> {
    if years > MAX_PROJECTION_YEARS {
        return Err(ProjectionError::InvalidInput {
            field: field.into(),
            reason: format!("Projection horizon must be <= {MAX_PROJECTION_YEARS} years"),
        });
    }
    Ok(())
}
