//! Time entry code resolution.
//!
//! Joins an employee's time code groups against the `time_entry_code_map`
//! reference table to produce the codes the kiosk offers.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{TimeEntryCode, TimeEntryCodeRow};
use crate::sources::TimeCodeSource;

/// Selects the reference rows whose group is one of `groups`, sorted by
/// `sort_order`.
///
/// Groups with no reference rows are dropped; this is a filtering join, not a
/// validation. Rows with equal sort order keep their reference-table order.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::resolve_time_entry_codes;
/// use timeclock_engine::models::TimeEntryCodeRow;
///
/// let rows = vec![
///     TimeEntryCodeRow {
///         time_code_group: "Student".to_string(),
///         backend_id: "TC_SICK".to_string(),
///         display_name: "Sick".to_string(),
///         sort_order: 2,
///     },
///     TimeEntryCodeRow {
///         time_code_group: "Student".to_string(),
///         backend_id: "TC_REG".to_string(),
///         display_name: "Regular".to_string(),
///         sort_order: 1,
///     },
/// ];
///
/// let codes = resolve_time_entry_codes(&["Student".to_string(), "Unknown".to_string()], &rows);
/// assert_eq!(codes.len(), 2);
/// assert_eq!(codes[0].display_name, "Regular");
/// ```
pub fn resolve_time_entry_codes(
    groups: &[String],
    rows: &[TimeEntryCodeRow],
) -> Vec<TimeEntryCode> {
    let mut codes: Vec<TimeEntryCode> = rows
        .iter()
        .filter(|row| groups.iter().any(|g| g == &row.time_code_group))
        .map(TimeEntryCode::from)
        .collect();
    codes.sort_by_key(|code| code.sort_order);

    for group in groups {
        if !rows.iter().any(|row| &row.time_code_group == group) {
            debug!(time_code_group = %group, "no time entry codes mapped for group");
        }
    }
    codes
}

/// Reads the reference table from `source` and resolves `groups` against it.
///
/// Any failure to read the table is reported as [`EngineError::LookupFailure`].
pub async fn lookup_time_entry_codes(
    source: &dyn TimeCodeSource,
    groups: &[String],
) -> EngineResult<Vec<TimeEntryCode>> {
    let rows = source
        .list_codes()
        .await
        .map_err(|err| EngineError::LookupFailure {
            message: err.to_string(),
        })?;
    Ok(resolve_time_entry_codes(groups, &rows))
}
