//! Punch models.
//!
//! A [`Punch`] is a single clock event written by the kiosk to the local time
//! clock database. A [`PeriodPunch`] is the display form of a punch that is not
//! part of any time block, whether it came from the local store or from Workday.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The direction of a clock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockEventType {
    /// Clocking in to a position.
    #[serde(rename = "IN", alias = "Check-in", alias = "Check-In", alias = "in")]
    In,
    /// Clocking out of a position.
    #[serde(rename = "OUT", alias = "Check-out", alias = "Check-Out", alias = "out")]
    Out,
}

impl ClockEventType {
    /// Parses any of the spellings used by the kiosk, the local store and Workday.
    ///
    /// # Example
    ///
    /// ```
    /// use timeclock_engine::models::ClockEventType;
    ///
    /// assert_eq!(ClockEventType::parse("IN"), Some(ClockEventType::In));
    /// assert_eq!(ClockEventType::parse("Check-Out"), Some(ClockEventType::Out));
    /// assert_eq!(ClockEventType::parse("lunch"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "in" | "check-in" | "check_in" | "checkin" => Some(ClockEventType::In),
            "out" | "check-out" | "check_out" | "checkout" => Some(ClockEventType::Out),
            _ => None,
        }
    }

    /// The canonical label shown to the UI.
    pub fn label(self) -> &'static str {
        match self {
            ClockEventType::In => "Check-in",
            ClockEventType::Out => "Check-out",
        }
    }

    /// The code stored in the local time clock database.
    pub fn code(self) -> &'static str {
        match self {
            ClockEventType::In => "IN",
            ClockEventType::Out => "OUT",
        }
    }
}

impl fmt::Display for ClockEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A clock event stored in the local time clock database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// The Workday worker identifier.
    pub worker_id: String,
    /// The position the event applies to.
    pub position_number: String,
    /// In or out.
    pub clock_event_type: ClockEventType,
    /// Backend time entry code reference.
    #[serde(default)]
    pub time_entry_code: String,
    /// Free-text comment from the kiosk.
    #[serde(default)]
    pub comment: String,
    /// When the event was recorded.
    pub time_clock_event_date_time: DateTime<Utc>,
}

/// A validated punch that has not been stamped with a time yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchDraft {
    /// The Workday worker identifier.
    pub worker_id: String,
    /// The position the event applies to.
    pub position_number: String,
    /// In or out.
    pub clock_event_type: ClockEventType,
    /// Backend time entry code reference.
    pub time_entry_code: String,
    /// Free-text comment from the kiosk.
    pub comment: String,
}

impl PunchDraft {
    /// Turns the draft into a punch recorded at `at`.
    pub fn stamp(self, at: DateTime<Utc>) -> Punch {
        Punch {
            worker_id: self.worker_id,
            position_number: self.position_number,
            clock_event_type: self.clock_event_type,
            time_entry_code: self.time_entry_code,
            comment: self.comment,
            time_clock_event_date_time: at,
        }
    }
}

/// The acknowledgement returned after a punch is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchReceipt {
    /// Whether the punch landed in the time clock database.
    pub written_to_tcd: bool,
    /// Server time of the write, RFC 1123 formatted.
    pub punch_time: String,
    /// The event type that was written.
    pub clock_event_type: ClockEventType,
    /// Hostname of the station that wrote the punch.
    pub hostname: String,
}

/// A punch with no associated time block, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPunch {
    /// The position the event applies to.
    pub position_number: String,
    /// Business title of the position, or `"none"` if it is not active.
    pub business_title: String,
    /// `Check-in` or `Check-out`.
    pub clock_event_type: String,
    /// Event time, RFC 3339 with offset.
    pub time_clock_event_date_time: String,
}
