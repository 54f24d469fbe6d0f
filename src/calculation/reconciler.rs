//! Time block reconciliation.
//!
//! This module merges an employee's active positions, the punches still
//! waiting in the local time clock database and the clock events and time
//! blocks Workday reports into the employee's `period_punches` and
//! `period_blocks`, repairing incomplete blocks and aggregating hour totals for
//! the current week and pay period.
//!
//! A single bad record never aborts the reconciliation: unparseable lengths
//! count as zero hours, blocks without a usable reported date are kept but
//! left out of the totals, and blocks with no usable data at all are dropped.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::endpoint_repair::{RepairOutcome, calculate_missing_endpoints, format_endpoint};
use super::totals::{format_hours, parse_hours};
use crate::models::{
    CalculatedBlockIndex, ClockEventType, CurrentWindows, Employee, ExternalTimeBlock, PeriodBlock,
    PeriodPunch, Punch, WorkerTimeReport,
};

/// Business title reported for a position that is not in the active set.
pub const UNKNOWN_POSITION_TITLE: &str = "none";

/// Everything the reconciler needs besides the employee itself.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileInput<'a> {
    /// Punches in the local store that Workday has not picked up yet.
    pub local_punches: &'a [Punch],
    /// Workday's report for the fetch window; `None` when Workday was offline.
    pub report: Option<&'a WorkerTimeReport>,
    /// Calculated time blocks keyed by time block reference.
    pub calculated: &'a CalculatedBlockIndex,
    /// Current week and pay period.
    pub windows: &'a CurrentWindows,
    /// Zone used to derive reported dates and render local punch times.
    pub time_zone: Tz,
}

/// Counters describing one reconciliation, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Punches (local and Workday) without a time block.
    pub loose_punches: usize,
    /// Blocks kept in `period_blocks`.
    pub blocks_retained: usize,
    /// Blocks discarded because Workday supplied nothing usable.
    pub blocks_dropped: usize,
    /// Blocks whose endpoints were reconstructed.
    pub blocks_repaired: usize,
    /// Blocks left with at least one `"N/A"` endpoint.
    pub blocks_incomplete: usize,
    /// Blocks left out of the totals for want of a reported date.
    pub blocks_undated: usize,
    /// Blocks left out of the totals because their hours overflowed them.
    pub blocks_overflowed: usize,
}

#[derive(Debug, Default)]
struct StagedEndpoints {
    time_in: Option<String>,
    time_out: Option<String>,
}

#[derive(Debug, Default)]
struct HourTotals {
    week: Decimal,
    period: Decimal,
}

impl HourTotals {
    /// The totals with `hours` added to the selected buckets, or `None` on overflow.
    fn checked_add(&self, hours: Decimal, week: bool, period: bool) -> Option<HourTotals> {
        Some(HourTotals {
            week: if week { self.week.checked_add(hours)? } else { self.week },
            period: if period { self.period.checked_add(hours)? } else { self.period },
        })
    }
}

/// Reconciles `employee` against local punches and Workday's report.
///
/// Replaces `period_punches` and `period_blocks`, rewrites every hour total
/// and, when Workday answered, the international status. Positions must
/// already hold the active set; only they accumulate totals.
pub fn reconcile_time_blocks(employee: &mut Employee, input: &ReconcileInput<'_>) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    let titles: HashMap<String, String> = employee
        .positions
        .iter()
        .map(|p| (p.position_number.clone(), p.business_title.clone()))
        .collect();
    let title_of = |position: &str| -> String {
        titles
            .get(position)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_POSITION_TITLE.to_string())
    };

    let mut period_punches = Vec::new();
    let mut period_blocks = Vec::new();
    let mut position_totals: HashMap<String, HourTotals> = HashMap::new();
    let mut employee_totals = HourTotals::default();

    if let Some(report) = input.report {
        employee.international_status = report.international_status;

        let mut staged: HashMap<&str, StagedEndpoints> = HashMap::new();
        for event in &report.clock_events {
            let Some(event_type) = ClockEventType::parse(&event.event_type) else {
                debug!(event_type = %event.event_type, time = %event.time, "skipping clock event of unknown type");
                continue;
            };
            if event.is_loose() {
                period_punches.push(PeriodPunch {
                    position_number: event.position.clone(),
                    business_title: title_of(&event.position),
                    clock_event_type: event_type.label().to_string(),
                    time_clock_event_date_time: event.time.clone(),
                });
                continue;
            }
            let endpoints = staged.entry(event.time_block_ref.trim()).or_default();
            let slot = match event_type {
                ClockEventType::In => &mut endpoints.time_in,
                ClockEventType::Out => &mut endpoints.time_out,
            };
            if event.time.trim().is_empty() {
                debug!(reference_id = %event.time_block_ref, %event_type, "skipping clock event without a time");
            } else if slot.is_some() {
                debug!(reference_id = %event.time_block_ref, %event_type, "duplicate clock event for time block");
            } else {
                *slot = Some(event.time.clone());
            }
        }

        for block in &report.time_blocks {
            let endpoints = staged.get(block.reference_id.trim());
            let Some(reconciled) = reconcile_block(block, endpoints, input, &mut summary) else {
                continue;
            };
            let Some(reported_date) = reported_date_of(block, &reconciled, input.time_zone) else {
                debug!(reference_id = %block.reference_id, "time block has no usable reported date");
                summary.blocks_undated += 1;
                period_blocks.push(reconciled.into_period_block(&block.position, title_of(&block.position), String::new()));
                continue;
            };

            if titles.contains_key(&block.position) {
                let in_week = input.windows.week.contains_date(reported_date);
                let in_period = input.windows.pay_period.contains_date(reported_date);
                let totals = position_totals.entry(block.position.clone()).or_default();
                match (
                    totals.checked_add(reconciled.hours, in_week, in_period),
                    employee_totals.checked_add(reconciled.hours, in_week, in_period),
                ) {
                    (Some(position_sum), Some(employee_sum)) => {
                        *totals = position_sum;
                        employee_totals = employee_sum;
                    }
                    _ => {
                        warn!(
                            reference_id = %block.reference_id,
                            hours = %reconciled.hours,
                            "time block hours overflow the totals; left out"
                        );
                        summary.blocks_overflowed += 1;
                    }
                }
            }

            period_blocks.push(reconciled.into_period_block(
                &block.position,
                title_of(&block.position),
                reported_date.format("%Y-%m-%d").to_string(),
            ));
        }
    }

    for punch in input.local_punches {
        let local_time = punch
            .time_clock_event_date_time
            .with_timezone(&input.time_zone)
            .fixed_offset();
        period_punches.push(PeriodPunch {
            position_number: punch.position_number.clone(),
            business_title: title_of(&punch.position_number),
            clock_event_type: punch.clock_event_type.label().to_string(),
            time_clock_event_date_time: format_endpoint(local_time),
        });
    }

    for position in &mut employee.positions {
        let totals = position_totals.remove(&position.position_number).unwrap_or_default();
        position.position_total_week_hours = format_hours(totals.week);
        position.position_total_period_hours = format_hours(totals.period);
    }
    employee.total_week_hours = format_hours(employee_totals.week);
    employee.total_period_hours = format_hours(employee_totals.period);

    summary.loose_punches = period_punches.len();
    summary.blocks_retained = period_blocks.len();
    employee.period_punches = period_punches;
    employee.period_blocks = period_blocks;

    debug!(
        worker_id = %employee.worker_id,
        loose_punches = summary.loose_punches,
        blocks_retained = summary.blocks_retained,
        blocks_dropped = summary.blocks_dropped,
        "reconciled time blocks"
    );
    summary
}

struct ReconciledBlock {
    time_in: String,
    time_out: String,
    length: String,
    hours: Decimal,
    reference_id: String,
}

impl ReconciledBlock {
    fn into_period_block(self, position: &str, business_title: String, reported_date: String) -> PeriodBlock {
        PeriodBlock {
            position_number: position.to_string(),
            business_title,
            time_clock_event_date_time_in: self.time_in,
            time_clock_event_date_time_out: self.time_out,
            length: self.length,
            reference_id: self.reference_id,
            reported_date,
        }
    }
}

fn reconcile_block(
    block: &ExternalTimeBlock,
    staged: Option<&StagedEndpoints>,
    input: &ReconcileInput<'_>,
    summary: &mut ReconcileSummary,
) -> Option<ReconciledBlock> {
    let length = match parse_hours(&block.hours) {
        Ok(hours) => Some(hours),
        Err(err) => {
            debug!(reference_id = %block.reference_id, error = %err, "treating block length as zero");
            None
        }
    };

    let time_in = non_blank(block.in_time.as_deref())
        .or_else(|| staged.and_then(|s| non_blank(s.time_in.as_deref())));
    let time_out = non_blank(block.out_time.as_deref())
        .or_else(|| staged.and_then(|s| non_blank(s.time_out.as_deref())));
    let fallback = input.calculated.get(block.reference_id.trim());

    if time_in.is_none() && time_out.is_none() && fallback.is_none() && length.is_none() {
        warn!(reference_id = %block.reference_id, position = %block.position, "dropping time block with no usable data");
        summary.blocks_dropped += 1;
        return None;
    }

    let repaired = calculate_missing_endpoints(time_in, time_out, length, fallback);
    match repaired.outcome {
        RepairOutcome::Complete => {}
        RepairOutcome::RepairedIn | RepairOutcome::RepairedOut | RepairOutcome::FromCalculated => {
            summary.blocks_repaired += 1;
        }
        RepairOutcome::Incomplete | RepairOutcome::Unavailable => {
            warn!(
                reference_id = %block.reference_id,
                position = %block.position,
                outcome = ?repaired.outcome,
                "time block kept with unavailable endpoints"
            );
            summary.blocks_incomplete += 1;
        }
    }

    Some(ReconciledBlock {
        time_in: repaired.time_in,
        time_out: repaired.time_out,
        length: block.hours.trim().to_string(),
        hours: length.unwrap_or(Decimal::ZERO),
        reference_id: block.reference_id.clone(),
    })
}

/// The block's reported date, or the local date of its clock-in time.
///
/// Workday dates may carry a trailing offset (`2024-01-10-07:00`); only the
/// calendar date is used.
fn reported_date_of(block: &ExternalTimeBlock, reconciled: &ReconciledBlock, time_zone: Tz) -> Option<NaiveDate> {
    if let Some(raw) = non_blank(block.reported_date.as_deref()) {
        let date = raw
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok());
        if date.is_none() {
            debug!(reference_id = %block.reference_id, reported_date = raw, "unparseable reported date");
        }
        return date;
    }
    DateTime::parse_from_rfc3339(&reconciled.time_in)
        .ok()
        .map(|time_in| time_in.with_timezone(&time_zone).date_naive())
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}
