//! Employee loading from roster records.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Position, RosterPosition, RosterRecord};

/// An employee built from a roster record, plus the time code groups that
/// select the employee's time entry codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedEmployee {
    /// The employee with active positions and zeroed totals.
    pub employee: Employee,
    /// Time code group names from the roster record.
    pub time_code_groups: Vec<String>,
}

/// Builds an [`Employee`] from its roster record.
///
/// Only active positions are kept, in roster order; a repeated position number
/// keeps its first occurrence. The supervisory org is rendered as
/// `"<org> (<manager>)"`.
///
/// # Errors
///
/// Returns [`EngineError::MalformedRecord`] if the embedded positions or time
/// code groups are not valid JSON of the expected shape.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::load_employee;
/// use timeclock_engine::models::RosterRecord;
///
/// let record = RosterRecord {
///     external_id: "123456789".to_string(),
///     worker_id: "W100".to_string(),
///     employee_name: "Doe, Jane".to_string(),
///     last_updated: None,
///     time_code_groups: r#"["Student"]"#.to_string(),
///     positions: r#"[
///         {"position_number": "P1", "is_active_position": true,
///          "business_title": "Custodian", "supervisory_org": "Facilities",
///          "manager_name": "Smith, Ann"},
///         {"position_number": "P2", "is_active_position": false}
///     ]"#.to_string(),
/// };
///
/// let loaded = load_employee(&record).unwrap();
/// assert_eq!(loaded.employee.positions_list, vec!["P1"]);
/// assert_eq!(loaded.employee.positions[0].supervisory_org, "Facilities (Smith, Ann)");
/// ```
pub fn load_employee(record: &RosterRecord) -> EngineResult<LoadedEmployee> {
    let positions: Vec<RosterPosition> = serde_json::from_str(&record.positions)
        .map_err(|err| EngineError::malformed("roster positions", err))?;
    let time_code_groups: Vec<String> = serde_json::from_str(&record.time_code_groups)
        .map_err(|err| EngineError::malformed("roster time code groups", err))?;

    let mut employee = Employee::new(record.worker_id.clone(), record.employee_name.clone());
    for position in positions.into_iter().filter(|p| p.is_active_position) {
        let supervisory_org = format!("{} ({})", position.supervisory_org, position.manager_name);
        let number = position.position_number.clone();
        if !employee.push_position(Position::new(
            position.position_number,
            position.business_title,
            supervisory_org,
            position.primary_position,
        )) {
            debug!(worker_id = %record.worker_id, position = %number, "duplicate active position ignored");
        }
    }

    debug!(
        worker_id = %record.worker_id,
        positions = employee.positions.len(),
        time_code_groups = time_code_groups.len(),
        "loaded employee"
    );
    Ok(LoadedEmployee {
        employee,
        time_code_groups,
    })
}
