//! Employee and position models.
//!
//! This module defines the [`Employee`] and [`Position`] structs returned to the
//! kiosk UI. Hour totals and clock status are derived per request by the
//! reconciler and the clock status evaluator.

use serde::{Deserialize, Serialize};

use super::bool_string;
use super::time_block::PeriodBlock;
use super::punch::PeriodPunch;
use super::time_entry_code::TimeEntryCode;

/// The placeholder rendered for an hour total that has no hours.
pub const ZERO_HOURS_PLACEHOLDER: &str = "0 H";

/// A single active position held by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// The Workday position identifier.
    pub position_number: String,
    /// Whether this is the employee's primary position.
    #[serde(with = "bool_string")]
    pub primary_position: bool,
    /// The position's business title.
    pub business_title: String,
    /// Supervisory organization, rendered as `"<org> (<manager>)"`.
    pub supervisory_org: String,
    /// Hours reported for this position in the current week.
    pub position_total_week_hours: String,
    /// Hours reported for this position in the current pay period.
    pub position_total_period_hours: String,
    /// Whether the employee is currently clocked in to this position.
    #[serde(with = "bool_string")]
    pub clocked_in: bool,
}

impl Position {
    /// Creates a position with zeroed totals and a clocked-out status.
    pub fn new(
        position_number: impl Into<String>,
        business_title: impl Into<String>,
        supervisory_org: impl Into<String>,
        primary_position: bool,
    ) -> Self {
        Self {
            position_number: position_number.into(),
            primary_position,
            business_title: business_title.into(),
            supervisory_org: supervisory_org.into(),
            position_total_week_hours: ZERO_HOURS_PLACEHOLDER.to_string(),
            position_total_period_hours: ZERO_HOURS_PLACEHOLDER.to_string(),
            clocked_in: false,
        }
    }
}

/// Everything the kiosk needs to know about an employee for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The employee's display name (`"Last, First Middle"`).
    pub employee_name: String,
    /// The Workday worker identifier.
    pub worker_id: String,
    /// Whether the employee is an international student.
    #[serde(with = "bool_string")]
    pub international_status: bool,
    /// Hours reported across all positions in the current week.
    pub total_week_hours: String,
    /// Hours reported across all positions in the current pay period.
    pub total_period_hours: String,
    /// Identifiers of the active positions, in roster order.
    pub positions_list: Vec<String>,
    /// Time entry codes the employee may punch with.
    pub time_entry_codes: Vec<TimeEntryCode>,
    /// Active positions.
    pub positions: Vec<Position>,
    /// Punches that are not (yet) part of a time block.
    pub period_punches: Vec<PeriodPunch>,
    /// Time blocks reported by Workday for the fetch window.
    pub period_blocks: Vec<PeriodBlock>,
}

impl Employee {
    /// Creates an employee with no positions, punches or blocks.
    pub fn new(worker_id: impl Into<String>, employee_name: impl Into<String>) -> Self {
        Self {
            employee_name: employee_name.into(),
            worker_id: worker_id.into(),
            international_status: false,
            total_week_hours: ZERO_HOURS_PLACEHOLDER.to_string(),
            total_period_hours: ZERO_HOURS_PLACEHOLDER.to_string(),
            positions_list: Vec::new(),
            time_entry_codes: Vec::new(),
            positions: Vec::new(),
            period_punches: Vec::new(),
            period_blocks: Vec::new(),
        }
    }

    /// Adds an active position, keeping `positions_list` in step.
    ///
    /// A position whose number is already present is ignored so that
    /// identifiers stay unique within the active set.
    pub fn push_position(&mut self, position: Position) -> bool {
        if self.position(&position.position_number).is_some() {
            return false;
        }
        self.positions_list.push(position.position_number.clone());
        self.positions.push(position);
        true
    }

    /// Looks up an active position by number.
    pub fn position(&self, position_number: &str) -> Option<&Position> {
        self.positions
            .iter()
            .find(|p| p.position_number == position_number)
    }
}
