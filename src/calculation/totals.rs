//! Hour parsing and total formatting.
//!
//! Workday reports block lengths as decimal text. Totals are accumulated as
//! [`Decimal`] so that repeated additions of values like `0.1` stay exact.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::ZERO_HOURS_PLACEHOLDER;

/// Parses a decimal hour length such as `"8.00"` or `" 7.5 "`.
///
/// Empty, non-numeric and negative values are rejected with
/// [`EngineError::ComputationSkipped`]; callers treat them as zero hours.
pub fn parse_hours(raw: &str) -> EngineResult<Decimal> {
    let trimmed = raw.trim();
    let hours = Decimal::from_str(trimmed).map_err(|err| EngineError::ComputationSkipped {
        what: "block length".to_string(),
        message: format!("{trimmed:?} is not a decimal: {err}"),
    })?;
    if hours.is_sign_negative() && !hours.is_zero() {
        return Err(EngineError::ComputationSkipped {
            what: "block length".to_string(),
            message: format!("{trimmed:?} is negative"),
        });
    }
    Ok(hours)
}

/// Renders an hour total for the kiosk.
///
/// A zero total renders as the `"0 H"` placeholder; anything else is rounded
/// half away from zero to two places and suffixed with `" H"`.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::format_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_hours(Decimal::ZERO), "0 H");
/// assert_eq!(format_hours(Decimal::from_str("12.5").unwrap()), "12.50 H");
/// assert_eq!(format_hours(Decimal::from_str("0.125").unwrap()), "0.13 H");
/// ```
pub fn format_hours(total: Decimal) -> String {
    if total.is_zero() {
        return ZERO_HOURS_PLACEHOLDER.to_string();
    }
    let rounded = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2} H")
}
