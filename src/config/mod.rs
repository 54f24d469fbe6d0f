//! Configuration loading and management for the Timeclock Engine.
//!
//! This module loads the engine configuration from a YAML file, with
//! database and Workday credentials optionally supplied by environment
//! variables.
//!
//! # Example
//!
//! ```no_run
//! use timeclock_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/timeclock.yaml").unwrap();
//! println!("Station: {}", loader.config().station.hostname);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, DatabaseConfig, FetchWindowConfig, LogFormat, LoggingConfig, PayPeriodConfig,
    RosterBackend, RosterConfig, RosterExportConfig, ServerConfig, StationConfig, TimeoutConfig,
    WorkdayConfig,
};
