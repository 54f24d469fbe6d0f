//! Time entry code models.

use serde::{Deserialize, Serialize};

/// A time entry code the kiosk may offer, in UI form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryCode {
    /// The Workday time code reference id.
    pub backend_id: String,
    /// The name shown on the kiosk.
    #[serde(rename = "frontend_name")]
    pub display_name: String,
    /// Position in the kiosk's list.
    pub sort_order: i32,
}

/// One row of the `time_entry_code_map` reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryCodeRow {
    /// The time code group this code belongs to.
    pub time_code_group: String,
    /// The Workday time code reference id.
    pub backend_id: String,
    /// The name shown on the kiosk.
    pub display_name: String,
    /// Position in the kiosk's list.
    pub sort_order: i32,
}

impl From<&TimeEntryCodeRow> for TimeEntryCode {
    fn from(row: &TimeEntryCodeRow) -> Self {
        TimeEntryCode {
            backend_id: row.backend_id.clone(),
            display_name: row.display_name.clone(),
            sort_order: row.sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_serializes_as_frontend_name() {
        let code = TimeEntryCode {
            backend_id: "TC_REG".to_string(),
            display_name: "Regular".to_string(),
            sort_order: 1,
        };
        let json = serde_json::to_string(&code).unwrap();
        assert!(json.contains("\"frontend_name\":\"Regular\""));
    }
}
