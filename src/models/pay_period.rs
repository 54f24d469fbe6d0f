//! Pay period and week window models.
//!
//! This module contains the [`Window`] type produced by the pay period
//! calculator, the [`CurrentWindows`] pair used for bucketing, and the
//! [`DateWindow`] used to bound Workday queries.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A closed time window: `start` at 00:00:00 of its first day, `end` at
/// 23:59:59 of its last day, both in the pay period time zone.
///
/// # Example
///
/// ```
/// use timeclock_engine::models::Window;
/// use chrono::{DateTime, NaiveDate};
///
/// let week = Window {
///     start: DateTime::parse_from_rfc3339("2024-01-06T00:00:00-07:00").unwrap(),
///     end: DateTime::parse_from_rfc3339("2024-01-12T23:59:59-07:00").unwrap(),
/// };
///
/// assert!(week.contains_date(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
/// assert!(week.contains_date(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()));
/// assert!(!week.contains_date(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// First instant of the window.
    pub start: DateTime<FixedOffset>,
    /// Last second of the window.
    pub end: DateTime<FixedOffset>,
}

impl Window {
    /// The calendar date the window starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// The calendar date the window ends on.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Checks if a calendar date falls within this window.
    ///
    /// Only the date component matters; the check is inclusive of both the
    /// first and the last day.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Checks if an instant falls within this window (inclusive).
    pub fn contains_instant(&self, instant: DateTime<FixedOffset>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// The current week and current pay period for a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWindows {
    /// The current week.
    pub week: Window,
    /// The current pay period.
    pub pay_period: Window,
}

/// An inclusive calendar-date range used to query Workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First date requested.
    pub start_date: NaiveDate,
    /// Last date requested.
    pub end_date: NaiveDate,
}
