//! Configuration types for the Timeclock Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has
//! defaults, so a file only needs to name what differs.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::calculation::default_anchor_date;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the built kiosk UI, served under `/analog`.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8463,
            static_dir: PathBuf::from("./dist/analog"),
        }
    }
}

/// Local time clock database connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Login role.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Database name.
    pub name: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: String::new(),
            password: String::new(),
            name: String::new(),
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

/// Workday API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkdayConfig {
    /// Tenant host, e.g. `https://wd2-impl-services1.workday.com`.
    pub base_url: String,
    /// Tenant name.
    pub tenant: String,
    /// Integration system user.
    pub user: String,
    /// Integration system user password.
    pub password: String,
    /// Owner of the custom reports.
    pub report_owner: String,
    /// Custom report with time blocks and clock events.
    pub timekeeping_report: String,
    /// Custom report with clocked time blocks.
    pub timeclocks_report: String,
    /// Time_Tracking web service version.
    pub time_tracking_version: String,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            tenant: String::new(),
            user: String::new(),
            password: String::new(),
            report_owner: "ISU_INT265".to_string(),
            timekeeping_report: "INT265_Timekeeping_System".to_string(),
            timeclocks_report: "INT265_Timeclocks".to_string(),
            time_tracking_version: "v41.1".to_string(),
            request_timeout_secs: 20,
        }
    }
}

/// Where employee lookups are served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterBackend {
    /// The `employee_cache` table of the time clock database.
    #[default]
    Database,
    /// An in-memory cache refreshed from the Workday roster export.
    Cache,
}

/// Bulk roster export endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterExportConfig {
    /// Worker summary export URL.
    pub worker_summary_url: String,
    /// Worker position export URL.
    pub worker_position_url: String,
    /// Rows requested per page.
    pub page_size: u32,
    /// Pages fetched before an export is abandoned.
    pub max_pages: u32,
    /// Bearer token; basic auth with the Workday credentials otherwise.
    pub bearer_token: Option<String>,
}

impl Default for RosterExportConfig {
    fn default() -> Self {
        Self {
            worker_summary_url: String::new(),
            worker_position_url: String::new(),
            page_size: 1000,
            max_pages: 500,
            bearer_token: None,
        }
    }
}

/// Roster settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Lookup backend.
    pub backend: RosterBackend,
    /// Hours between cache refreshes.
    pub refresh_interval_hours: u64,
    /// Minutes before retrying a failed refresh.
    pub retry_interval_minutes: u64,
    /// JSON snapshot of the cache, loaded at startup.
    pub snapshot_path: Option<PathBuf>,
    /// Export endpoints used by the cache backend.
    pub export: RosterExportConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            backend: RosterBackend::Database,
            refresh_interval_hours: 12,
            retry_interval_minutes: 10,
            snapshot_path: None,
            export: RosterExportConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Interval between successful refreshes.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_hours * 60 * 60)
    }

    /// Delay after a failed refresh.
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_minutes * 60)
    }
}

/// Pay period anchoring.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayPeriodConfig {
    /// First day of a known pay period.
    pub anchor: NaiveDate,
    /// IANA zone the kiosk's calendar runs in.
    pub time_zone: String,
}

impl Default for PayPeriodConfig {
    fn default() -> Self {
        Self {
            anchor: default_anchor_date(),
            time_zone: "America/Denver".to_string(),
        }
    }
}

/// The date range requested from Workday.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FetchWindowConfig {
    /// Calendar months before today.
    pub lookback_months: u32,
    /// Days after today.
    pub lookahead_days: i64,
}

impl Default for FetchWindowConfig {
    fn default() -> Self {
        Self {
            lookback_months: 1,
            lookahead_days: 1,
        }
    }
}

/// Per-source deadlines for one employee request.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Roster lookup.
    pub roster_secs: u64,
    /// Time entry code table.
    pub time_codes_secs: u64,
    /// Local punch store.
    pub punch_store_secs: u64,
    /// Workday custom reports.
    pub workday_secs: u64,
    /// Workday calculated time blocks.
    pub calculated_blocks_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            roster_secs: 5,
            time_codes_secs: 5,
            punch_store_secs: 5,
            workday_secs: 25,
            calculated_blocks_secs: 25,
        }
    }
}

/// Log output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Initial level (`debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output encoding.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Identity of this kiosk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Hostname recorded with every punch.
    pub hostname: String,
}

/// The complete Timeclock Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server.
    pub server: ServerConfig,
    /// Local time clock database.
    pub database: DatabaseConfig,
    /// Workday API.
    pub workday: WorkdayConfig,
    /// Roster backend.
    pub roster: RosterConfig,
    /// Pay period anchoring.
    pub pay_period: PayPeriodConfig,
    /// Workday query window.
    pub fetch_window: FetchWindowConfig,
    /// Per-source deadlines.
    pub timeouts: TimeoutConfig,
    /// Logging.
    pub logging: LoggingConfig,
    /// This kiosk.
    pub station: StationConfig,
}
