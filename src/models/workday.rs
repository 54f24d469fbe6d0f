//! Time data as reported by Workday.
//!
//! These are the inputs of the reconciler: loose and block-bound clock events,
//! the reported time blocks, and the supplemental calculated time block index.
//! Timestamps are kept as the strings Workday sent; the reconciler parses them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A clock event known to Workday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalClockEvent {
    /// Event time (RFC 3339).
    pub time: String,
    /// Event type as spelled by Workday (`Check-in`, `Check-out`, ...).
    pub event_type: String,
    /// Position the event applies to.
    pub position: String,
    /// Reference of the time block this event belongs to; empty when unmatched.
    #[serde(default)]
    pub time_block_ref: String,
}

impl ExternalClockEvent {
    /// Returns true if the event has not been folded into a time block.
    pub fn is_loose(&self) -> bool {
        self.time_block_ref.trim().is_empty()
    }
}

/// A time block reported by Workday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTimeBlock {
    /// Workday time block reference.
    pub reference_id: String,
    /// Position the block was worked in.
    pub position: String,
    /// Decimal hours as text.
    pub hours: String,
    /// Clock-in time, when Workday included it.
    #[serde(default)]
    pub in_time: Option<String>,
    /// Clock-out time, when Workday included it.
    #[serde(default)]
    pub out_time: Option<String>,
    /// Reported date (`YYYY-MM-DD`), when Workday included it.
    #[serde(default)]
    pub reported_date: Option<String>,
    /// Workday time type descriptor.
    #[serde(default)]
    pub time_type: Option<String>,
}

/// Everything Workday reports about a worker for a date window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTimeReport {
    /// Whether the worker is flagged as an international student.
    pub international_status: bool,
    /// Clock events, both loose and block-bound.
    pub clock_events: Vec<ExternalClockEvent>,
    /// Reported time blocks.
    pub time_blocks: Vec<ExternalTimeBlock>,
}

/// A calculated time block from the Workday time tracking service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedTimeBlock {
    /// Worker time block reference the calculation belongs to.
    pub reference_id: String,
    /// Calculated clock-in time.
    pub in_time: Option<String>,
    /// Calculated clock-out time.
    pub out_time: Option<String>,
    /// Calculated quantity (hours) as text.
    pub calculated_quantity: Option<String>,
    /// Status reference id.
    pub status: Option<String>,
    /// Calculation tag reference id.
    pub calculation_tag: Option<String>,
}

/// Calculated time blocks keyed by worker time block reference.
pub type CalculatedBlockIndex = HashMap<String, CalculatedTimeBlock>;
