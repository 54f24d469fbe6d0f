//! Time block models.
//!
//! A [`PeriodBlock`] is a matched in/out pair for one position as reported by
//! Workday, after endpoint repair. Endpoints that could not be determined carry
//! the [`UNAVAILABLE_ENDPOINT`] sentinel.

use serde::{Deserialize, Serialize};

/// Sentinel for an endpoint that neither Workday nor the repair step could supply.
pub const UNAVAILABLE_ENDPOINT: &str = "N/A";

/// A reconciled time block, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBlock {
    /// The position the block was worked in.
    pub position_number: String,
    /// Business title of the position, or `"none"` if it is not active.
    pub business_title: String,
    /// Clock-in time (RFC 3339) or [`UNAVAILABLE_ENDPOINT`].
    pub time_clock_event_date_time_in: String,
    /// Clock-out time (RFC 3339) or [`UNAVAILABLE_ENDPOINT`].
    pub time_clock_event_date_time_out: String,
    /// Decimal hours as reported by Workday.
    pub length: String,
    /// Workday time block reference.
    #[serde(rename = "reference_id")]
    pub reference_id: String,
    /// Date used for week/period bucketing (`YYYY-MM-DD`), empty if unknown.
    pub reported_date: String,
}

impl PeriodBlock {
    /// Returns true if both endpoints are known.
    pub fn is_complete(&self) -> bool {
        self.time_clock_event_date_time_in != UNAVAILABLE_ENDPOINT
            && self.time_clock_event_date_time_out != UNAVAILABLE_ENDPOINT
    }
}
