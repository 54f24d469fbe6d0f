//! Postgres-backed time clock database (TCD).
//!
//! Reads and writes the `workday` schema: `timeevents` for punches,
//! `time_entry_code_map` for time entry codes and `employee_cache` for the
//! roster. Every value is bound as a query parameter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool, Row};
use tracing::{debug, warn};

use super::{PunchStore, RosterSource, TimeCodeSource};
use crate::config::DatabaseConfig;
use crate::error::{DataSource, EngineError, EngineResult};
use crate::models::{ClockEventType, Punch, PunchReceipt, RosterRecord, TimeEntryCodeRow};

const INSERT_PUNCH_SQL: &str = r#"INSERT INTO workday.timeevents
    (employee_id, position_id, clock_event_type, time_entry_code, "comment", time_clock_event_date_time, pi_hostname)
    VALUES ($1, $2, $3, $4, $5, $6, $7)"#;

const UNRECONCILED_PUNCHES_SQL: &str = r#"SELECT employee_id, position_id, clock_event_type, time_entry_code, "comment", time_clock_event_date_time
    FROM workday.timeevents
    WHERE employee_id = $1 AND uploaded_to_workday_date_time IS NULL AND failed_to_upload IS false
    ORDER BY time_clock_event_date_time"#;

const TIME_ENTRY_CODES_SQL: &str = r#"SELECT time_code_groups, time_code_reference_id, ui_name, sort_order
    FROM workday.time_entry_code_map
    WHERE ui_name IS NOT NULL"#;

const EMPLOYEE_CACHE_SQL: &str = r#"SELECT worker_id, byu_id, last_updated::text AS last_updated, employee_name, time_code_group, positions
    FROM workday.employee_cache
    WHERE byu_id = $1"#;

/// Connection to the time clock database.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    hostname: String,
}

impl PostgresStore {
    /// Creates a store with a lazily connected pool.
    ///
    /// No connection is attempted until the first query, so the service
    /// starts even when the database is down. Must be called within a Tokio
    /// runtime.
    pub fn connect_lazy(config: &DatabaseConfig, hostname: impl Into<String>) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);
        Self::with_pool(pool, hostname)
    }

    /// Wraps an existing pool.
    pub fn with_pool(pool: PgPool, hostname: impl Into<String>) -> Self {
        Self {
            pool,
            hostname: hostname.into(),
        }
    }

    /// The station hostname recorded with every punch.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// A `timeevents` row as selected for reconciliation.
#[derive(Debug, Clone, FromRow)]
struct TimeEventRow {
    employee_id: String,
    position_id: String,
    clock_event_type: String,
    time_entry_code: Option<String>,
    comment: Option<String>,
    time_clock_event_date_time: DateTime<Utc>,
}

impl TryFrom<TimeEventRow> for Punch {
    type Error = EngineError;

    fn try_from(row: TimeEventRow) -> EngineResult<Self> {
        let clock_event_type = ClockEventType::parse(&row.clock_event_type).ok_or_else(|| {
            EngineError::malformed(
                "timeevents row",
                format!("unknown clock_event_type {:?}", row.clock_event_type),
            )
        })?;
        Ok(Punch {
            worker_id: row.employee_id,
            position_number: row.position_id,
            clock_event_type,
            time_entry_code: row.time_entry_code.unwrap_or_default(),
            comment: row.comment.unwrap_or_default(),
            time_clock_event_date_time: row.time_clock_event_date_time,
        })
    }
}

/// An `employee_cache` row.
#[derive(Debug, Clone, FromRow)]
struct EmployeeCacheRow {
    worker_id: String,
    byu_id: String,
    last_updated: Option<String>,
    employee_name: String,
    time_code_group: String,
    positions: String,
}

impl From<EmployeeCacheRow> for RosterRecord {
    fn from(row: EmployeeCacheRow) -> Self {
        RosterRecord {
            external_id: row.byu_id,
            worker_id: row.worker_id,
            employee_name: row.employee_name,
            last_updated: row.last_updated,
            time_code_groups: row.time_code_group,
            positions: row.positions,
        }
    }
}

#[async_trait]
impl PunchStore for PostgresStore {
    async fn insert_punch(&self, punch: &Punch) -> EngineResult<PunchReceipt> {
        sqlx::query(INSERT_PUNCH_SQL)
            .bind(&punch.worker_id)
            .bind(&punch.position_number)
            .bind(punch.clock_event_type.code())
            .bind(&punch.time_entry_code)
            .bind(&punch.comment)
            .bind(punch.time_clock_event_date_time)
            .bind(&self.hostname)
            .execute(&self.pool)
            .await
            .map_err(|err| EngineError::unavailable(DataSource::PunchStore, err))?;

        debug!(
            worker_id = %punch.worker_id,
            position = %punch.position_number,
            clock_event_type = %punch.clock_event_type,
            "punch written to time clock database"
        );
        Ok(PunchReceipt {
            written_to_tcd: true,
            punch_time: punch.time_clock_event_date_time.to_rfc2822(),
            clock_event_type: punch.clock_event_type,
            hostname: self.hostname.clone(),
        })
    }

    async fn unreconciled_punches(&self, worker_id: &str) -> EngineResult<Vec<Punch>> {
        let rows: Vec<TimeEventRow> = sqlx::query_as(UNRECONCILED_PUNCHES_SQL)
            .bind(worker_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| EngineError::unavailable(DataSource::PunchStore, err))?;

        let mut punches = Vec::with_capacity(rows.len());
        for row in rows {
            match Punch::try_from(row) {
                Ok(punch) => punches.push(punch),
                Err(err) => warn!(worker_id, error = %err, "skipping malformed timeevents row"),
            }
        }
        Ok(punches)
    }
}

#[async_trait]
impl TimeCodeSource for PostgresStore {
    async fn list_codes(&self) -> EngineResult<Vec<TimeEntryCodeRow>> {
        let rows = sqlx::query(TIME_ENTRY_CODES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| EngineError::unavailable(DataSource::TimeEntryCodes, err))?;

        rows.iter()
            .map(|row| -> Result<TimeEntryCodeRow, sqlx::Error> {
                Ok(TimeEntryCodeRow {
                    time_code_group: row.try_get("time_code_groups")?,
                    backend_id: row.try_get("time_code_reference_id")?,
                    display_name: row.try_get("ui_name")?,
                    sort_order: row.try_get("sort_order")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|err| EngineError::malformed("time_entry_code_map row", err))
    }
}

#[async_trait]
impl RosterSource for PostgresStore {
    async fn lookup(&self, external_id: &str) -> EngineResult<RosterRecord> {
        let row: EmployeeCacheRow = sqlx::query_as(EMPLOYEE_CACHE_SQL)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                    EngineError::malformed("employee_cache row", err)
                }
                err => EngineError::unavailable(DataSource::Roster, err),
            })?
            .ok_or_else(|| EngineError::NotFound {
                entity: "employee".to_string(),
                id: external_id.to_string(),
            })?;

        let record = RosterRecord::from(row);

        if record.worker_id.trim().is_empty() {
            return Err(EngineError::NotFound {
                entity: "employee".to_string(),
                id: external_id.to_string(),
            });
        }
        Ok(record)
    }
}
