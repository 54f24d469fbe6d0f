//! Calculation logic for the Timeclock Engine.
//!
//! This module contains the pure, request-scoped computations: employee
//! loading from roster records, time entry code resolution, pay period and
//! week windows, missing-endpoint repair, time block reconciliation with hour
//! totals, and clocked-in state evaluation.

mod clock_status;
mod endpoint_repair;
mod loader;
mod pay_period;
mod reconciler;
mod time_codes;
mod totals;

pub use clock_status::{evaluate_clocked_in, is_clocked_in};
pub use endpoint_repair::{
    RepairOutcome, RepairedEndpoints, calculate_missing_endpoints, format_endpoint, shift_by_hours,
};
pub use loader::{LoadedEmployee, load_employee};
pub use pay_period::{
    DAYS_PER_PAY_PERIOD, DAYS_PER_WEEK, DEFAULT_TIME_ZONE, PayPeriodCalculator, default_anchor_date,
};
pub use reconciler::{
    ReconcileInput, ReconcileSummary, UNKNOWN_POSITION_TITLE, reconcile_time_blocks,
};
pub use time_codes::{lookup_time_entry_codes, resolve_time_entry_codes};
pub use totals::{format_hours, parse_hours};
