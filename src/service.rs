//! The employee session service.
//!
//! [`TimeclockService`] resolves an employee, gathers what every collaborator
//! knows about them, and runs the calculation pipeline. Only identity
//! resolution can fail a request; every other source degrades to "offline"
//! and the response carries whatever the remaining sources supplied.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calculation::{
    PayPeriodCalculator, ReconcileInput, evaluate_clocked_in, load_employee,
    lookup_time_entry_codes, reconcile_time_blocks,
};
use crate::config::{FetchWindowConfig, TimeoutConfig};
use crate::error::{DataSource, EngineError, EngineResult};
use crate::models::{
    CalculatedBlockIndex, ClockEventType, Employee, Punch, PunchDraft, PunchReceipt, Window,
    WorkerTimeReport,
};
use crate::sources::{PunchStore, RosterSource, TimeCodeSource, TimeTrackingSource};

/// Source of the current instant.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The collaborators the service reads from and writes to.
#[derive(Clone)]
pub struct ServiceSources {
    /// Employee lookup.
    pub roster: Arc<dyn RosterSource>,
    /// Time entry code reference table.
    pub time_codes: Arc<dyn TimeCodeSource>,
    /// Local punch store.
    pub punches: Arc<dyn PunchStore>,
    /// Workday time tracking data.
    pub time_tracking: Arc<dyn TimeTrackingSource>,
}

/// Whether each source answered, as reported to the kiosk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    /// The roster answered.
    #[serde(rename = "TCD_employee_cache_online")]
    pub employee_cache_online: bool,
    /// Workday's custom reports answered.
    #[serde(rename = "workdayAPI_online")]
    pub workday_api_online: bool,
    /// The local punch table answered.
    #[serde(rename = "TCD_timeevents_online")]
    pub timeevents_online: bool,
    /// Punches are waiting in the local store.
    #[serde(rename = "unprocessed_punches_in_tcd")]
    pub unprocessed_punches: bool,
}

/// A source failure that did not fail the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceError {
    /// The source that failed.
    pub source: DataSource,
    /// What went wrong.
    pub message: String,
}

/// Everything the kiosk shows for one employee session.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSnapshot {
    /// Per-source availability.
    pub status: SourceStatus,
    /// Punches waiting in the local store.
    pub unprocessed_punches_in_tcd: usize,
    /// Failures of degraded sources.
    pub errors: Vec<SourceError>,
    /// The current week.
    pub current_week: Window,
    /// The current pay period.
    pub current_pay_period: Window,
    /// The reconciled employee.
    pub employee: Employee,
}

/// Orchestrates employee sessions and punch recording.
#[derive(Clone)]
pub struct TimeclockService {
    sources: ServiceSources,
    calculator: PayPeriodCalculator,
    fetch_window: FetchWindowConfig,
    timeouts: TimeoutConfig,
    clock: Clock,
}

impl TimeclockService {
    /// Creates a service reading the wall clock.
    pub fn new(
        sources: ServiceSources,
        calculator: PayPeriodCalculator,
        fetch_window: FetchWindowConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            sources,
            calculator,
            fetch_window,
            timeouts,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the clock, for tests and replays.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The current instant according to the service's clock.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// The pay period calculator in use.
    pub fn calculator(&self) -> &PayPeriodCalculator {
        &self.calculator
    }

    /// Builds the kiosk view of the employee with external id `external_id`.
    ///
    /// # Errors
    ///
    /// Fails only when the employee cannot be resolved: the roster has no such
    /// employee, the roster is unreachable, or the employee's roster record is
    /// malformed.
    pub async fn employee_snapshot(&self, external_id: &str) -> EngineResult<EmployeeSnapshot> {
        let reference = self.now();
        let windows = self.calculator.current_windows(reference);
        let fetch_window = self.calculator.fetch_window(
            reference,
            self.fetch_window.lookback_months,
            self.fetch_window.lookahead_days,
        );

        let record = bounded(
            DataSource::Roster,
            self.timeouts.roster_secs,
            self.sources.roster.lookup(external_id),
        )
        .await?;
        let loaded = load_employee(&record)?;
        let mut employee = loaded.employee;
        let mut status = SourceStatus {
            employee_cache_online: true,
            ..SourceStatus::default()
        };
        let mut errors = Vec::new();

        match bounded(
            DataSource::TimeEntryCodes,
            self.timeouts.time_codes_secs,
            lookup_time_entry_codes(self.sources.time_codes.as_ref(), &loaded.time_code_groups),
        )
        .await
        {
            Ok(codes) => employee.time_entry_codes = codes,
            Err(err) => degrade(&mut errors, DataSource::TimeEntryCodes, err),
        }

        let (punches, report) = tokio::join!(
            bounded(
                DataSource::PunchStore,
                self.timeouts.punch_store_secs,
                self.sources.punches.unreconciled_punches(&employee.worker_id),
            ),
            bounded(
                DataSource::WorkdayApi,
                self.timeouts.workday_secs,
                self.sources.time_tracking.time_report(external_id, &fetch_window),
            ),
        );

        let punches = match punches {
            Ok(punches) => {
                status.timeevents_online = true;
                punches
            }
            Err(err) => {
                degrade(&mut errors, DataSource::PunchStore, err);
                Vec::new()
            }
        };
        status.unprocessed_punches = !punches.is_empty();

        let report = match report {
            Ok(report) => {
                status.workday_api_online = true;
                Some(report)
            }
            Err(err) => {
                degrade(&mut errors, DataSource::WorkdayApi, err);
                None
            }
        };

        let mut calculated = CalculatedBlockIndex::new();
        if report.as_ref().is_some_and(needs_calculated_blocks) {
            match bounded(
                DataSource::CalculatedTimeBlocks,
                self.timeouts.calculated_blocks_secs,
                self.sources
                    .time_tracking
                    .calculated_time_blocks(external_id, &fetch_window),
            )
            .await
            {
                Ok(index) => calculated = index,
                Err(err) => degrade(&mut errors, DataSource::CalculatedTimeBlocks, err),
            }
        }

        let summary = reconcile_time_blocks(
            &mut employee,
            &ReconcileInput {
                local_punches: &punches,
                report: report.as_ref(),
                calculated: &calculated,
                windows: &windows,
                time_zone: self.calculator.time_zone(),
            },
        );
        let clocked_in = evaluate_clocked_in(&mut employee);

        info!(
            worker_id = %employee.worker_id,
            positions = employee.positions.len(),
            clocked_in,
            loose_punches = summary.loose_punches,
            blocks = summary.blocks_retained,
            blocks_repaired = summary.blocks_repaired,
            blocks_dropped = summary.blocks_dropped,
            degraded_sources = errors.len(),
            "built employee snapshot"
        );

        Ok(EmployeeSnapshot {
            status,
            unprocessed_punches_in_tcd: punches.len(),
            errors,
            current_week: windows.week,
            current_pay_period: windows.pay_period,
            employee,
        })
    }

    /// Stamps `draft` with the server time and writes it to the local store.
    pub async fn record_punch(&self, external_id: &str, draft: PunchDraft) -> EngineResult<PunchReceipt> {
        let punch = draft.stamp(self.now());
        let receipt = bounded(
            DataSource::PunchStore,
            self.timeouts.punch_store_secs,
            self.sources.punches.insert_punch(&punch),
        )
        .await?;
        info!(
            external_id,
            worker_id = %punch.worker_id,
            position = %punch.position_number,
            clock_event_type = %punch.clock_event_type,
            "recorded punch"
        );
        Ok(receipt)
    }

    /// Punches for `worker_id` still waiting in the local store.
    pub async fn unreconciled_punches(&self, worker_id: &str) -> EngineResult<Vec<Punch>> {
        bounded(
            DataSource::PunchStore,
            self.timeouts.punch_store_secs,
            self.sources.punches.unreconciled_punches(worker_id),
        )
        .await
    }
}

/// Awaits `call`, failing with [`EngineError::SourceUnavailable`] after
/// `secs` seconds.
async fn bounded<T, F>(source: DataSource, secs: u64, call: F) -> EngineResult<T>
where
    F: Future<Output = EngineResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(secs), call).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::unavailable(source, format!("timed out after {secs}s"))),
    }
}

fn degrade(errors: &mut Vec<SourceError>, source: DataSource, err: EngineError) {
    warn!(%source, error = %err, "source degraded to offline");
    errors.push(SourceError {
        source: err.source_kind().unwrap_or(source),
        message: err.to_string(),
    });
}

/// Whether any reported block lacks both endpoints, counting block-bound
/// clock events as endpoints.
fn needs_calculated_blocks(report: &WorkerTimeReport) -> bool {
    let needed = report.time_blocks.iter().any(|block| {
        let has = |event_type: ClockEventType, own: Option<&String>| {
            own.is_some_and(|t| !t.trim().is_empty())
                || report.clock_events.iter().any(|event| {
                    event.time_block_ref.trim() == block.reference_id.trim()
                        && !event.time.trim().is_empty()
                        && ClockEventType::parse(&event.event_type) == Some(event_type)
                })
        };
        !has(ClockEventType::In, block.in_time.as_ref()) && !has(ClockEventType::Out, block.out_time.as_ref())
    });
    if needed {
        debug!("fetching calculated time blocks for blocks without endpoints");
    }
    needed
}
