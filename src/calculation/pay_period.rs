//! Pay period and week window calculation.
//!
//! Pay periods are fourteen days long and weeks seven, both counted from a
//! fixed anchor date. All arithmetic happens on civil dates in a single time
//! zone so that the windows do not depend on the server's locale.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::models::{CurrentWindows, DateWindow, Window};

/// Days in one week window.
pub const DAYS_PER_WEEK: i64 = 7;

/// Days in one pay period window.
pub const DAYS_PER_PAY_PERIOD: i64 = 14;

const SECONDS_PER_WEEK: i64 = DAYS_PER_WEEK * 24 * 60 * 60;

/// The date that establishes the biweekly pay period cadence.
pub fn default_anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 9).unwrap_or(NaiveDate::MIN)
}

/// The zone every window is computed in.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::Denver;

/// Computes current week and pay period windows for a reference instant.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::PayPeriodCalculator;
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let calculator = PayPeriodCalculator::default();
/// // Wednesday 2024-01-10, mid-morning in Denver
/// let reference = Utc.with_ymd_and_hms(2024, 1, 10, 17, 0, 0).unwrap();
///
/// let week = calculator.current_week(reference);
/// assert_eq!(week.start_date(), NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
/// assert_eq!(week.end_date(), NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
///
/// let period = calculator.current_pay_period(reference);
/// assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
/// assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2024, 1, 19).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriodCalculator {
    anchor: NaiveDate,
    time_zone: Tz,
}

impl Default for PayPeriodCalculator {
    fn default() -> Self {
        Self::new(default_anchor_date(), DEFAULT_TIME_ZONE)
    }
}

impl PayPeriodCalculator {
    /// Creates a calculator anchored at midnight of `anchor` in `time_zone`.
    pub fn new(anchor: NaiveDate, time_zone: Tz) -> Self {
        Self { anchor, time_zone }
    }

    /// The anchor date.
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// The zone windows are computed in.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Whole weeks elapsed between the anchor and `reference`, floored.
    ///
    /// Measured on civil (wall clock) time in the calculator's zone, so a
    /// daylight saving shift never moves a reference into the previous week.
    /// Negative for references before the anchor.
    pub fn elapsed_weeks(&self, reference: DateTime<Utc>) -> i64 {
        let local = reference.with_timezone(&self.time_zone).naive_local();
        (local - self.anchor.and_time(NaiveTime::MIN))
            .num_seconds()
            .div_euclid(SECONDS_PER_WEEK)
    }

    /// The week containing `reference`.
    pub fn current_week(&self, reference: DateTime<Utc>) -> Window {
        let weeks = self.elapsed_weeks(reference);
        let start = self.anchor + Duration::days(weeks * DAYS_PER_WEEK);
        let window = self.window(start, DAYS_PER_WEEK);
        debug!(start = %window.start, end = %window.end, "current week");
        window
    }

    /// The pay period containing `reference`.
    pub fn current_pay_period(&self, reference: DateTime<Utc>) -> Window {
        let periods = self.elapsed_weeks(reference).div_euclid(2);
        let start = self.anchor + Duration::days(periods * DAYS_PER_PAY_PERIOD);
        let window = self.window(start, DAYS_PER_PAY_PERIOD);
        debug!(start = %window.start, end = %window.end, "current pay period");
        window
    }

    /// Both windows for `reference`.
    pub fn current_windows(&self, reference: DateTime<Utc>) -> CurrentWindows {
        CurrentWindows {
            week: self.current_week(reference),
            pay_period: self.current_pay_period(reference),
        }
    }

    /// The date range to request from Workday: `lookback_months` before
    /// tomorrow through `lookahead_days` after today, in the calculator's zone.
    ///
    /// The extra day tolerates clock skew between the kiosk and Workday.
    pub fn fetch_window(
        &self,
        reference: DateTime<Utc>,
        lookback_months: u32,
        lookahead_days: i64,
    ) -> DateWindow {
        let today = reference.with_timezone(&self.time_zone).date_naive();
        let end_date = today + Duration::days(lookahead_days);
        let start_date = end_date
            .checked_sub_months(Months::new(lookback_months))
            .unwrap_or(end_date);
        DateWindow {
            start_date,
            end_date,
        }
    }

    /// The calendar date of `instant` in this zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }

    fn window(&self, start: NaiveDate, days: i64) -> Window {
        let last_day = start + Duration::days(days - 1);
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        Window {
            start: self.local_instant(start.and_time(NaiveTime::MIN)).fixed_offset(),
            end: self.local_instant(last_day.and_time(end_of_day)).fixed_offset(),
        }
    }

    fn local_instant(&self, civil: NaiveDateTime) -> DateTime<Tz> {
        // A civil time skipped by a DST gap is read as UTC.
        self.time_zone
            .from_local_datetime(&civil)
            .earliest()
            .unwrap_or_else(|| self.time_zone.from_utc_datetime(&civil))
    }
}
