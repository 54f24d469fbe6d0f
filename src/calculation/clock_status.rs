//! Clocked-in state evaluation.
//!
//! A position is clocked in when its most recent clock-in is strictly later
//! than its most recent clock-out. Both time block endpoints and loose punches
//! count; `"N/A"` endpoints and unparseable times are ignored.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::models::{ClockEventType, Employee, UNAVAILABLE_ENDPOINT};

#[derive(Debug, Default, Clone, Copy)]
struct LastEvents {
    last_in: Option<DateTime<FixedOffset>>,
    last_out: Option<DateTime<FixedOffset>>,
}

impl LastEvents {
    fn record(&mut self, event_type: ClockEventType, raw: &str) {
        if raw.trim().is_empty() || raw == UNAVAILABLE_ENDPOINT {
            return;
        }
        let instant = match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(instant) => instant,
            Err(err) => {
                debug!(time = raw, error = %err, "ignoring unparseable clock event time");
                return;
            }
        };
        let slot = match event_type {
            ClockEventType::In => &mut self.last_in,
            ClockEventType::Out => &mut self.last_out,
        };
        if slot.is_none_or(|current| instant > current) {
            *slot = Some(instant);
        }
    }
}

/// Decides the clocked-in state from the latest clock-in and clock-out.
///
/// A clock-in with no clock-out is clocked in; equal times are clocked out.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::is_clocked_in;
/// use chrono::DateTime;
///
/// let t1 = DateTime::parse_from_rfc3339("2024-01-10T08:00:00-07:00").unwrap();
/// let t2 = DateTime::parse_from_rfc3339("2024-01-10T12:00:00-07:00").unwrap();
///
/// assert!(is_clocked_in(Some(t1), None));
/// assert!(!is_clocked_in(Some(t1), Some(t2)));
/// assert!(!is_clocked_in(Some(t1), Some(t1)));
/// assert!(!is_clocked_in(None, None));
/// ```
pub fn is_clocked_in(
    last_in: Option<DateTime<FixedOffset>>,
    last_out: Option<DateTime<FixedOffset>>,
) -> bool {
    match (last_in, last_out) {
        (Some(last_in), Some(last_out)) => last_in > last_out,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Sets `clocked_in` on every active position of `employee`.
///
/// Reads `period_blocks` and `period_punches`, so it must run after
/// reconciliation. Returns the number of positions that are clocked in.
pub fn evaluate_clocked_in(employee: &mut Employee) -> usize {
    let mut clocked_in = 0;
    for position in &mut employee.positions {
        let mut events = LastEvents::default();
        for block in employee
            .period_blocks
            .iter()
            .filter(|b| b.position_number == position.position_number)
        {
            events.record(ClockEventType::In, &block.time_clock_event_date_time_in);
            events.record(ClockEventType::Out, &block.time_clock_event_date_time_out);
        }
        for punch in employee
            .period_punches
            .iter()
            .filter(|p| p.position_number == position.position_number)
        {
            match ClockEventType::parse(&punch.clock_event_type) {
                Some(event_type) => events.record(event_type, &punch.time_clock_event_date_time),
                None => debug!(event_type = %punch.clock_event_type, "ignoring punch of unknown type"),
            }
        }

        position.clocked_in = is_clocked_in(events.last_in, events.last_out);
        if position.clocked_in {
            clocked_in += 1;
        }
        debug!(
            worker_id = %employee.worker_id,
            position = %position.position_number,
            clocked_in = position.clocked_in,
            "evaluated clock status"
        );
    }
    clocked_in
}
