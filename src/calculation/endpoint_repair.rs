//! Missing-endpoint repair for Workday time blocks.
//!
//! Workday frequently reports a block's length together with only one of its
//! endpoints. The other endpoint is reconstructed from the length; when both
//! are missing the calculated time block index is consulted, and failing that
//! both endpoints carry the [`UNAVAILABLE_ENDPOINT`] sentinel.

use chrono::{DateTime, Duration, FixedOffset};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CalculatedTimeBlock, UNAVAILABLE_ENDPOINT};

const ENDPOINT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// How a block's endpoints were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairOutcome {
    /// Both endpoints were reported; nothing changed.
    Complete,
    /// The clock-in time was computed from the clock-out time and length.
    RepairedIn,
    /// The clock-out time was computed from the clock-in time and length.
    RepairedOut,
    /// Endpoints were taken from the calculated time block index.
    FromCalculated,
    /// One endpoint is known but the other could not be computed.
    Incomplete,
    /// Neither endpoint could be determined.
    Unavailable,
}

/// A block's endpoints after repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedEndpoints {
    /// Clock-in time or [`UNAVAILABLE_ENDPOINT`].
    pub time_in: String,
    /// Clock-out time or [`UNAVAILABLE_ENDPOINT`].
    pub time_out: String,
    /// How the endpoints were obtained.
    pub outcome: RepairOutcome,
}

/// Fills in whichever endpoints of a block are missing.
///
/// * both present: returned unchanged
/// * one present and `length` known: `out = in + length` or `in = out - length`,
///   to the second, in the offset of the known endpoint
/// * none present: the `fallback` calculated block's endpoints, completed from
///   `length` if it only has one; otherwise both become `"N/A"`
///
/// Blank strings and the `"N/A"` sentinel count as missing, so the repair is
/// idempotent.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::{RepairOutcome, calculate_missing_endpoints};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let repaired = calculate_missing_endpoints(
///     Some("2024-01-10T08:00:00-07:00"),
///     None,
///     Some(Decimal::from_str("8.00").unwrap()),
///     None,
/// );
///
/// assert_eq!(repaired.time_out, "2024-01-10T16:00:00-07:00");
/// assert_eq!(repaired.outcome, RepairOutcome::RepairedOut);
/// ```
pub fn calculate_missing_endpoints(
    time_in: Option<&str>,
    time_out: Option<&str>,
    length: Option<Decimal>,
    fallback: Option<&CalculatedTimeBlock>,
) -> RepairedEndpoints {
    let time_in = present(time_in);
    let time_out = present(time_out);

    match (time_in, time_out) {
        (Some(time_in), Some(time_out)) => RepairedEndpoints {
            time_in: time_in.to_string(),
            time_out: time_out.to_string(),
            outcome: RepairOutcome::Complete,
        },
        (Some(_), None) | (None, Some(_)) => complete_from_length(time_in, time_out, length),
        (None, None) => {
            let calculated = fallback.map(|block| {
                (
                    present(block.in_time.as_deref()),
                    present(block.out_time.as_deref()),
                )
            });
            match calculated {
                Some((Some(calc_in), Some(calc_out))) => RepairedEndpoints {
                    time_in: calc_in.to_string(),
                    time_out: calc_out.to_string(),
                    outcome: RepairOutcome::FromCalculated,
                },
                Some((calc_in, calc_out)) if calc_in.is_some() || calc_out.is_some() => {
                    let mut repaired = complete_from_length(calc_in, calc_out, length);
                    if repaired.outcome != RepairOutcome::Incomplete {
                        repaired.outcome = RepairOutcome::FromCalculated;
                    }
                    repaired
                }
                _ => RepairedEndpoints {
                    time_in: UNAVAILABLE_ENDPOINT.to_string(),
                    time_out: UNAVAILABLE_ENDPOINT.to_string(),
                    outcome: RepairOutcome::Unavailable,
                },
            }
        }
    }
}

/// Shifts `instant` by `hours`, rounded to the nearest second.
pub fn shift_by_hours(
    instant: DateTime<FixedOffset>,
    hours: Decimal,
) -> Option<DateTime<FixedOffset>> {
    let seconds = hours.checked_mul(Decimal::from(3600))?.round().to_i64()?;
    instant.checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Formats an endpoint the way repaired endpoints are reported.
pub fn format_endpoint(instant: DateTime<FixedOffset>) -> String {
    instant.format(ENDPOINT_FORMAT).to_string()
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && *value != UNAVAILABLE_ENDPOINT)
}

fn complete_from_length(
    time_in: Option<&str>,
    time_out: Option<&str>,
    length: Option<Decimal>,
) -> RepairedEndpoints {
    let sentinel = || UNAVAILABLE_ENDPOINT.to_string();
    match (time_in, time_out) {
        (Some(known_in), None) => {
            let computed = length.and_then(|hours| {
                let start = DateTime::parse_from_rfc3339(known_in).ok()?;
                shift_by_hours(start, hours)
            });
            match computed {
                Some(end) => RepairedEndpoints {
                    time_in: known_in.to_string(),
                    time_out: format_endpoint(end),
                    outcome: RepairOutcome::RepairedOut,
                },
                None => {
                    debug!(time_in = known_in, "cannot compute clock-out time");
                    RepairedEndpoints {
                        time_in: known_in.to_string(),
                        time_out: sentinel(),
                        outcome: RepairOutcome::Incomplete,
                    }
                }
            }
        }
        (None, Some(known_out)) => {
            let computed = length.and_then(|hours| {
                let end = DateTime::parse_from_rfc3339(known_out).ok()?;
                shift_by_hours(end, -hours)
            });
            match computed {
                Some(start) => RepairedEndpoints {
                    time_in: format_endpoint(start),
                    time_out: known_out.to_string(),
                    outcome: RepairOutcome::RepairedIn,
                },
                None => {
                    debug!(time_out = known_out, "cannot compute clock-in time");
                    RepairedEndpoints {
                        time_in: sentinel(),
                        time_out: known_out.to_string(),
                        outcome: RepairOutcome::Incomplete,
                    }
                }
            }
        }
        (Some(known_in), Some(known_out)) => RepairedEndpoints {
            time_in: known_in.to_string(),
            time_out: known_out.to_string(),
            outcome: RepairOutcome::Complete,
        },
        (None, None) => RepairedEndpoints {
            time_in: sentinel(),
            time_out: sentinel(),
            outcome: RepairOutcome::Unavailable,
        },
    }
}
