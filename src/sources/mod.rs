//! External collaborators of the Timeclock Engine.
//!
//! Each collaborator sits behind an `async_trait` so the service can run
//! against Postgres and Workday in production and in-memory fakes in tests.

mod postgres;
mod roster_cache;
mod workday;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{
    CalculatedBlockIndex, DateWindow, Punch, PunchReceipt, RosterRecord, TimeEntryCodeRow,
    WorkerTimeReport,
};

pub use postgres::PostgresStore;
pub use roster_cache::{RosterCache, spawn_refresh_loop};
pub use workday::{
    ExportInfo, ExportPaging, RosterExportPage, WorkdayClient, WorkerPositionRow, WorkerSummaryRow,
    build_calculated_blocks_request, merge_roster_export, parse_calculated_time_blocks,
};

/// The local time clock database's punch table.
#[async_trait]
pub trait PunchStore: Send + Sync {
    /// Writes one punch and acknowledges it.
    async fn insert_punch(&self, punch: &Punch) -> EngineResult<PunchReceipt>;

    /// Punches for `worker_id` that have not been uploaded to Workday and
    /// have not failed to upload.
    async fn unreconciled_punches(&self, worker_id: &str) -> EngineResult<Vec<Punch>>;
}

/// Resolves employees by external id.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Returns the roster record for `external_id`, or
    /// [`crate::error::EngineError::NotFound`].
    async fn lookup(&self, external_id: &str) -> EngineResult<RosterRecord>;
}

/// The time entry code reference table.
#[async_trait]
pub trait TimeCodeSource: Send + Sync {
    /// All rows that have a display name.
    async fn list_codes(&self) -> EngineResult<Vec<TimeEntryCodeRow>>;
}

/// Workday's time tracking data.
#[async_trait]
pub trait TimeTrackingSource: Send + Sync {
    /// Clock events and time blocks for an employee within `window`.
    async fn time_report(&self, external_id: &str, window: &DateWindow) -> EngineResult<WorkerTimeReport>;

    /// Calculated time blocks for an employee within `window`, keyed by time
    /// block reference.
    async fn calculated_time_blocks(
        &self,
        external_id: &str,
        window: &DateWindow,
    ) -> EngineResult<CalculatedBlockIndex>;
}

/// The bulk roster export used to refresh the roster cache.
#[async_trait]
pub trait RosterExport: Send + Sync {
    /// Every active worker with their active positions.
    async fn fetch_roster(&self) -> EngineResult<Vec<RosterRecord>>;
}
