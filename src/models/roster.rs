//! Roster models.
//!
//! A [`RosterRecord`] is one entry of the employee roster. Its time code groups
//! and positions are stored as embedded JSON text, the way the roster cache
//! table keeps them; [`crate::calculation::load_employee`] parses them.

use serde::{Deserialize, Serialize};

/// A roster entry keyed by the employee's external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    /// The identifier the kiosk looks employees up by (badge/BYU id).
    pub external_id: String,
    /// The Workday worker identifier.
    pub worker_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// When the record was last refreshed, as reported by the source.
    #[serde(default)]
    pub last_updated: Option<String>,
    /// JSON array of time code group names.
    pub time_code_groups: String,
    /// JSON array of [`RosterPosition`] objects.
    pub positions: String,
}

/// A position as embedded in a roster record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPosition {
    /// The Workday position identifier.
    pub position_number: String,
    /// Whether this is the primary position.
    #[serde(default)]
    pub primary_position: bool,
    /// Inactive positions are excluded from every computation.
    pub is_active_position: bool,
    /// The position's business title.
    #[serde(default)]
    pub business_title: String,
    /// Supervisory organization name.
    #[serde(default)]
    pub supervisory_org: String,
    /// Manager of the supervisory organization.
    #[serde(default)]
    pub manager_name: String,
}
