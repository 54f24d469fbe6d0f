//! Core data models for the Timeclock Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_period;
mod punch;
mod roster;
mod time_block;
mod time_entry_code;
mod workday;

pub use employee::{Employee, Position, ZERO_HOURS_PLACEHOLDER};
pub use pay_period::{CurrentWindows, DateWindow, Window};
pub use punch::{ClockEventType, PeriodPunch, Punch, PunchDraft, PunchReceipt};
pub use roster::{RosterPosition, RosterRecord};
pub use time_block::{PeriodBlock, UNAVAILABLE_ENDPOINT};
pub use time_entry_code::{TimeEntryCode, TimeEntryCodeRow};
pub use workday::{
    CalculatedBlockIndex, CalculatedTimeBlock, ExternalClockEvent, ExternalTimeBlock,
    WorkerTimeReport,
};

/// Booleans travel to the kiosk UI as `"true"` / `"false"` strings.
mod bool_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(D::Error::custom(format!("expected \"true\" or \"false\", got {other:?}"))),
        }
    }
}
