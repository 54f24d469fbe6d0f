//! Integration tests for the Timeclock Engine HTTP API.
//!
//! The router is driven end to end against in-memory collaborators:
//! - Employee lookup with local punches only
//! - Block repair and hour totals
//! - Inactive positions and degraded sources
//! - Punch recording and listing
//! - Operational endpoints

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use timeclock_engine::api::{AppState, create_router};
use timeclock_engine::calculation::PayPeriodCalculator;
use timeclock_engine::config::{FetchWindowConfig, TimeoutConfig};
use timeclock_engine::error::{DataSource, EngineError, EngineResult};
use timeclock_engine::models::{
    CalculatedBlockIndex, CalculatedTimeBlock, ClockEventType, DateWindow, ExternalClockEvent,
    ExternalTimeBlock, Punch, PunchReceipt, RosterRecord, TimeEntryCodeRow, WorkerTimeReport,
};
use timeclock_engine::service::{ServiceSources, TimeclockService};
use timeclock_engine::sources::{
    PunchStore, RosterCache, RosterSource, TimeCodeSource, TimeTrackingSource,
};
use timeclock_engine::telemetry::{LogLevel, LogLevelControl};

// =============================================================================
// In-memory collaborators
// =============================================================================

struct FakeRoster {
    records: HashMap<String, RosterRecord>,
}

#[async_trait]
impl RosterSource for FakeRoster {
    async fn lookup(&self, external_id: &str) -> EngineResult<RosterRecord> {
        self.records
            .get(external_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                entity: "employee".to_string(),
                id: external_id.to_string(),
            })
    }
}

struct FakeCodes {
    rows: Vec<TimeEntryCodeRow>,
    offline: bool,
}

#[async_trait]
impl TimeCodeSource for FakeCodes {
    async fn list_codes(&self) -> EngineResult<Vec<TimeEntryCodeRow>> {
        if self.offline {
            return Err(EngineError::unavailable(DataSource::TimeEntryCodes, "connection refused"));
        }
        Ok(self.rows.clone())
    }
}

#[derive(Default)]
struct FakePunchStore {
    punches: Mutex<Vec<Punch>>,
    offline: bool,
}

#[async_trait]
impl PunchStore for FakePunchStore {
    async fn insert_punch(&self, punch: &Punch) -> EngineResult<PunchReceipt> {
        if self.offline {
            return Err(EngineError::unavailable(DataSource::PunchStore, "connection refused"));
        }
        self.punches.lock().unwrap().push(punch.clone());
        Ok(PunchReceipt {
            written_to_tcd: true,
            punch_time: punch.time_clock_event_date_time.to_rfc2822(),
            clock_event_type: punch.clock_event_type,
            hostname: "kiosk-test".to_string(),
        })
    }

    async fn unreconciled_punches(&self, worker_id: &str) -> EngineResult<Vec<Punch>> {
        if self.offline {
            return Err(EngineError::unavailable(DataSource::PunchStore, "connection refused"));
        }
        Ok(self
            .punches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.worker_id == worker_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct FakeWorkday {
    report: Option<WorkerTimeReport>,
    calculated: CalculatedBlockIndex,
    calculated_calls: AtomicUsize,
}

#[async_trait]
impl TimeTrackingSource for FakeWorkday {
    async fn time_report(&self, _external_id: &str, _window: &DateWindow) -> EngineResult<WorkerTimeReport> {
        self.report
            .clone()
            .ok_or_else(|| EngineError::unavailable(DataSource::WorkdayApi, "503 Service Unavailable"))
    }

    async fn calculated_time_blocks(
        &self,
        _external_id: &str,
        _window: &DateWindow,
    ) -> EngineResult<CalculatedBlockIndex> {
        self.calculated_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.calculated.clone())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Wednesday 2024-01-10, 10:00 in Denver. Week: 01-06..01-12, period: 01-06..01-19.
fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 17, 0, 0).unwrap()
}

fn roster_record() -> RosterRecord {
    RosterRecord {
        external_id: "123456789".to_string(),
        worker_id: "W100".to_string(),
        employee_name: "Doe, Jane".to_string(),
        last_updated: None,
        time_code_groups: r#"["Student"]"#.to_string(),
        positions: json!([
            {
                "position_number": "P1",
                "primary_position": true,
                "is_active_position": true,
                "business_title": "Custodian",
                "supervisory_org": "Facilities",
                "manager_name": "Smith, Ann"
            },
            {
                "position_number": "P2",
                "primary_position": false,
                "is_active_position": false,
                "business_title": "Grader",
                "supervisory_org": "Math",
                "manager_name": "Lee, Kim"
            }
        ])
        .to_string(),
    }
}

fn time_code_rows() -> Vec<TimeEntryCodeRow> {
    vec![
        TimeEntryCodeRow {
            time_code_group: "Student".to_string(),
            backend_id: "TC_SICK".to_string(),
            display_name: "Sick".to_string(),
            sort_order: 2,
        },
        TimeEntryCodeRow {
            time_code_group: "Student".to_string(),
            backend_id: "TC_REG".to_string(),
            display_name: "Regular".to_string(),
            sort_order: 1,
        },
        TimeEntryCodeRow {
            time_code_group: "Staff".to_string(),
            backend_id: "TC_OT".to_string(),
            display_name: "Overtime".to_string(),
            sort_order: 1,
        },
    ]
}

fn block(reference_id: &str, position: &str, hours: &str, in_time: Option<&str>, reported_date: &str) -> ExternalTimeBlock {
    ExternalTimeBlock {
        reference_id: reference_id.to_string(),
        position: position.to_string(),
        hours: hours.to_string(),
        in_time: in_time.map(str::to_string),
        out_time: None,
        reported_date: Some(reported_date.to_string()),
        time_type: None,
    }
}

struct Harness {
    punches: Arc<FakePunchStore>,
    workday: Arc<FakeWorkday>,
    codes_offline: bool,
    state_hook: Option<Box<dyn FnOnce(AppState) -> AppState>>,
}

impl Harness {
    fn new(report: Option<WorkerTimeReport>) -> Self {
        Self {
            punches: Arc::new(FakePunchStore::default()),
            workday: Arc::new(FakeWorkday {
                report,
                ..FakeWorkday::default()
            }),
            codes_offline: false,
            state_hook: None,
        }
    }

    fn with_punches(self, punches: Vec<Punch>) -> Self {
        *self.punches.punches.lock().unwrap() = punches;
        self
    }

    fn with_punch_store(mut self, store: FakePunchStore) -> Self {
        self.punches = Arc::new(store);
        self
    }

    fn with_workday(mut self, workday: FakeWorkday) -> Self {
        self.workday = Arc::new(workday);
        self
    }

    fn router(&mut self) -> Router {
        let sources = ServiceSources {
            roster: Arc::new(FakeRoster {
                records: HashMap::from([("123456789".to_string(), roster_record())]),
            }),
            time_codes: Arc::new(FakeCodes {
                rows: time_code_rows(),
                offline: self.codes_offline,
            }),
            punches: self.punches.clone(),
            time_tracking: self.workday.clone(),
        };
        let service = TimeclockService::new(
            sources,
            PayPeriodCalculator::default(),
            FetchWindowConfig::default(),
            TimeoutConfig::default(),
        )
        .with_clock(Arc::new(reference_time));
        let state = AppState::new(service, LogLevelControl::detached(LogLevel::Info));
        let state = match self.state_hook.take() {
            Some(hook) => hook(state),
            None => state,
        };
        create_router(state)
    }
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

async fn get_employee(router: Router) -> (StatusCode, Value) {
    send(router, "GET", "/employee/123456789", None).await
}

// =============================================================================
// Employee lookup
// =============================================================================

#[tokio::test]
async fn test_local_in_punch_without_blocks_is_clocked_in() {
    let punch = Punch {
        worker_id: "W100".to_string(),
        position_number: "P1".to_string(),
        clock_event_type: ClockEventType::In,
        time_entry_code: "TC_REG".to_string(),
        comment: String::new(),
        time_clock_event_date_time: Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap(),
    };
    let mut harness = Harness::new(Some(WorkerTimeReport::default())).with_punches(vec![punch]);

    let (status, body) = get_employee(harness.router()).await;
    assert_eq!(status, StatusCode::OK);

    let employee = &body["employee"];
    assert_eq!(employee["worker_id"], "W100");
    assert_eq!(employee["period_punches"].as_array().unwrap().len(), 1);
    assert_eq!(employee["period_punches"][0]["clock_event_type"], "Check-in");
    assert_eq!(
        employee["period_punches"][0]["time_clock_event_date_time"],
        "2024-01-10T08:00:00-07:00"
    );
    assert_eq!(employee["positions"][0]["clocked_in"], "true");
    assert_eq!(employee["positions"][0]["position_total_week_hours"], "0 H");
    assert_eq!(employee["total_week_hours"], "0 H");
    assert_eq!(employee["total_period_hours"], "0 H");

    assert_eq!(body["unprocessed_punches_in_tcd"], 1);
    assert_eq!(body["status"]["unprocessed_punches_in_tcd"], true);
    assert_eq!(body["status"]["TCD_timeevents_online"], true);
    assert_eq!(body["status"]["workdayAPI_online"], true);
}

#[tokio::test]
async fn test_block_missing_out_is_repaired_and_totalled() {
    let report = WorkerTimeReport {
        time_blocks: vec![block(
            "TB-1",
            "P1",
            "8.00",
            Some("2024-01-09T08:00:00-07:00"),
            "2024-01-09-07:00",
        )],
        ..WorkerTimeReport::default()
    };
    let mut harness = Harness::new(Some(report));

    let (status, body) = get_employee(harness.router()).await;
    assert_eq!(status, StatusCode::OK);

    let employee = &body["employee"];
    let repaired = &employee["period_blocks"][0];
    assert_eq!(repaired["time_clock_event_date_time_in"], "2024-01-09T08:00:00-07:00");
    assert_eq!(repaired["time_clock_event_date_time_out"], "2024-01-09T16:00:00-07:00");
    assert_eq!(repaired["reported_date"], "2024-01-09");
    assert_eq!(employee["total_week_hours"], "8.00 H");
    assert_eq!(employee["total_period_hours"], "8.00 H");
    assert_eq!(employee["positions"][0]["position_total_week_hours"], "8.00 H");
    assert_eq!(employee["positions"][0]["clocked_in"], "false");
    assert_eq!(harness.workday.calculated_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_block_from_previous_week_counts_toward_period_only() {
    let report = WorkerTimeReport {
        time_blocks: vec![
            block("TB-1", "P1", "4.5", Some("2024-01-09T08:00:00-07:00"), "2024-01-09"),
            block("TB-0", "P1", "3", Some("2024-01-05T08:00:00-07:00"), "2024-01-05"),
        ],
        ..WorkerTimeReport::default()
    };
    let mut harness = Harness::new(Some(report));

    let (_, body) = get_employee(harness.router()).await;
    let employee = &body["employee"];
    assert_eq!(employee["total_week_hours"], "4.50 H");
    // 2024-01-05 falls in the previous pay period
    assert_eq!(employee["total_period_hours"], "4.50 H");
    assert_eq!(employee["period_blocks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_inactive_position_hours_are_excluded() {
    let report = WorkerTimeReport {
        time_blocks: vec![
            block("TB-1", "P1", "2", Some("2024-01-09T08:00:00-07:00"), "2024-01-09"),
            block("TB-2", "P2", "5", Some("2024-01-09T11:00:00-07:00"), "2024-01-09"),
        ],
        ..WorkerTimeReport::default()
    };
    let mut harness = Harness::new(Some(report));

    let (_, body) = get_employee(harness.router()).await;
    let employee = &body["employee"];
    assert_eq!(employee["positions_list"], json!(["P1"]));
    assert_eq!(employee["total_week_hours"], "2.00 H");
    let blocks = employee["period_blocks"].as_array().unwrap();
    let inactive = blocks.iter().find(|b| b["position_number"] == "P2").unwrap();
    assert_eq!(inactive["business_title"], "none");
}

#[tokio::test]
async fn test_block_without_endpoints_uses_calculated_blocks() {
    let report = WorkerTimeReport {
        time_blocks: vec![block("TB-9", "P1", "3", None, "2024-01-08")],
        clock_events: vec![ExternalClockEvent {
            time: "2024-01-10T09:00:00-07:00".to_string(),
            event_type: "Check-in".to_string(),
            position: "P1".to_string(),
            time_block_ref: String::new(),
        }],
        ..WorkerTimeReport::default()
    };
    let calculated = CalculatedBlockIndex::from([(
        "TB-9".to_string(),
        CalculatedTimeBlock {
            reference_id: "TB-9".to_string(),
            in_time: Some("2024-01-08T13:00:00-07:00".to_string()),
            out_time: Some("2024-01-08T16:00:00-07:00".to_string()),
            ..CalculatedTimeBlock::default()
        },
    )]);
    let mut harness = Harness::new(None).with_workday(FakeWorkday {
        report: Some(report),
        calculated,
        calculated_calls: AtomicUsize::new(0),
    });

    let (status, body) = get_employee(harness.router()).await;
    assert_eq!(status, StatusCode::OK);
    let employee = &body["employee"];
    assert_eq!(employee["period_blocks"][0]["time_clock_event_date_time_in"], "2024-01-08T13:00:00-07:00");
    assert_eq!(employee["period_blocks"][0]["time_clock_event_date_time_out"], "2024-01-08T16:00:00-07:00");
    assert_eq!(employee["period_punches"][0]["clock_event_type"], "Check-in");
    assert_eq!(employee["positions"][0]["clocked_in"], "true");
    assert_eq!(employee["total_week_hours"], "3.00 H");
    assert_eq!(harness.workday.calculated_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_time_entry_codes_follow_groups_and_sort_order() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));

    let (_, body) = get_employee(harness.router()).await;
    let codes = body["employee"]["time_entry_codes"].as_array().unwrap();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[0]["frontend_name"], "Regular");
    assert_eq!(codes[1]["backend_id"], "TC_SICK");
}

#[tokio::test]
async fn test_response_carries_current_windows() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));

    let (_, body) = get_employee(harness.router()).await;
    assert_eq!(body["current_week"]["start"], "2024-01-06T00:00:00-07:00");
    assert_eq!(body["current_week"]["end"], "2024-01-12T23:59:59-07:00");
    assert_eq!(body["current_pay_period"]["end"], "2024-01-19T23:59:59-07:00");
}

#[tokio::test]
async fn test_unknown_employee_is_not_found() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));

    let (status, body) = send(harness.router(), "GET", "/employee/000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Degraded sources
// =============================================================================

#[tokio::test]
async fn test_workday_offline_still_returns_local_data() {
    let punch = Punch {
        worker_id: "W100".to_string(),
        position_number: "P1".to_string(),
        clock_event_type: ClockEventType::In,
        time_entry_code: String::new(),
        comment: String::new(),
        time_clock_event_date_time: Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap(),
    };
    let mut harness = Harness::new(None).with_punches(vec![punch]);

    let (status, body) = get_employee(harness.router()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["workdayAPI_online"], false);
    assert_eq!(body["status"]["TCD_employee_cache_online"], true);
    assert_eq!(body["errors"][0]["source"], "workday_api");
    assert_eq!(body["employee"]["positions"][0]["clocked_in"], "true");
}

#[tokio::test]
async fn test_punch_store_offline_is_reported() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default())).with_punch_store(FakePunchStore {
        offline: true,
        ..FakePunchStore::default()
    });

    let (status, body) = get_employee(harness.router()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["TCD_timeevents_online"], false);
    assert_eq!(body["unprocessed_punches_in_tcd"], 0);
    assert_eq!(body["employee"]["period_punches"], json!([]));
}

#[tokio::test]
async fn test_time_codes_offline_leaves_codes_empty() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));
    harness.codes_offline = true;

    let (status, body) = get_employee(harness.router()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee"]["time_entry_codes"], json!([]));
    assert_eq!(body["errors"][0]["source"], "time_entry_codes");
}

// =============================================================================
// Punches
// =============================================================================

#[tokio::test]
async fn test_post_punch_records_server_time() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));
    let body = json!({
        "worker_id": "W100",
        "position_number": "P1",
        "clock_event_type": "IN",
        "time_entry_code": "TC_REG",
        "comment": "",
        "time_clock_event_date_time": "1999-01-01T00:00:00Z"
    });

    let (status, receipt) = send(harness.router(), "POST", "/punch/123456789", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["written_to_tcd"], true);
    assert_eq!(receipt["clock_event_type"], "IN");
    assert_eq!(receipt["punch_time"], "Wed, 10 Jan 2024 17:00:00 +0000");

    let stored = harness.punches.punches.lock().unwrap().clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].time_clock_event_date_time, reference_time());
}

#[tokio::test]
async fn test_post_punch_then_employee_is_clocked_in() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));
    let body = json!({
        "worker_id": "W100",
        "position_number": "P1",
        "clock_event_type": "Check-in",
        "time_entry_code": "TC_REG"
    });
    let (status, _) = send(harness.router(), "POST", "/punch/123456789", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, employee) = get_employee(harness.router()).await;
    assert_eq!(employee["employee"]["positions"][0]["clocked_in"], "true");
}

#[tokio::test]
async fn test_post_punch_with_bad_event_type() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));
    let body = json!({
        "worker_id": "W100",
        "position_number": "P1",
        "clock_event_type": "LUNCH"
    });

    let (status, error) = send(harness.router(), "POST", "/punch/123456789", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PUNCH");
    assert!(harness.punches.punches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_punch_missing_field() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default()));
    let body = json!({ "worker_id": "W100", "clock_event_type": "IN" });

    let (status, error) = send(harness.router(), "POST", "/punch/123456789", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_post_punch_store_offline() {
    let mut harness = Harness::new(Some(WorkerTimeReport::default())).with_punch_store(FakePunchStore {
        offline: true,
        ..FakePunchStore::default()
    });
    let body = json!({
        "worker_id": "W100",
        "position_number": "P1",
        "clock_event_type": "OUT"
    });

    let (status, error) = send(harness.router(), "POST", "/punch/123456789", Some(body)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error["code"], "SOURCE_UNAVAILABLE");
}

#[tokio::test]
async fn test_get_punches_lists_unreconciled() {
    let punch = Punch {
        worker_id: "W100".to_string(),
        position_number: "P1".to_string(),
        clock_event_type: ClockEventType::Out,
        time_entry_code: String::new(),
        comment: "forgot".to_string(),
        time_clock_event_date_time: Utc.with_ymd_and_hms(2024, 1, 10, 16, 0, 0).unwrap(),
    };
    let mut harness = Harness::new(None).with_punches(vec![punch]);

    let (status, body) = send(harness.router(), "GET", "/punches/W100", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["clock_event_type"], "OUT");
    assert_eq!(body[0]["comment"], "forgot");
}

// =============================================================================
// Operational endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let mut harness = Harness::new(None);
    let (status, body) = send(harness.router(), "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "healthy");

    let (_, body) = send(harness.router(), "GET", "/ping", None).await;
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_log_level_round_trip() {
    let mut harness = Harness::new(None);
    let router = harness.router();

    let (status, body) = send(router.clone(), "PUT", "/log-level/debug", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["log_level"], "debug");

    let (_, body) = send(router.clone(), "GET", "/log-level", None).await;
    assert_eq!(body["log_level"], "debug");

    let (status, body) = send(router, "PUT", "/log-level/verbose", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_LOG_LEVEL");
}

#[tokio::test]
async fn test_roster_refresh_without_cache_conflicts() {
    let mut harness = Harness::new(None);
    let (status, body) = send(harness.router(), "POST", "/roster/refresh", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NO_ROSTER_CACHE");
}

#[tokio::test]
async fn test_roster_refresh_wakes_cache_loop() {
    let cache = Arc::new(RosterCache::new(None));
    cache.replace(vec![roster_record()], Utc::now()).await;
    let trigger = Arc::new(tokio::sync::Notify::new());

    let mut harness = Harness::new(None);
    let (hook_cache, hook_trigger) = (cache.clone(), trigger.clone());
    harness.state_hook = Some(Box::new(move |state| state.with_roster_refresh(hook_cache, hook_trigger)));

    let (status, body) = send(harness.router(), "POST", "/roster/refresh", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["cached_records"], 1);

    // The stored permit lets the next waiter through immediately.
    tokio::time::timeout(std::time::Duration::from_secs(1), trigger.notified())
        .await
        .expect("refresh trigger was not notified");
}
