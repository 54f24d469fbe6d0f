//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file, overlaying secrets from the environment
//! and validating the result.

use std::fs;
use std::path::Path;

use chrono_tz::Tz;

use crate::calculation::PayPeriodCalculator;
use crate::error::{EngineError, EngineResult};

use super::types::{AppConfig, RosterBackend};

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use timeclock_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/timeclock.yaml")?;
/// println!("Listening on port {}", loader.config().server.port);
/// # Ok::<(), timeclock_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    time_zone: Tz,
}

impl ConfigLoader {
    /// Loads configuration from `path`, applying overrides from the process
    /// environment.
    ///
    /// Returns an error if the file is missing, is not valid YAML, or fails
    /// validation.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Loads configuration from `path`, reading overrides through `lookup`.
    pub fn load_with_env<P, F>(path: P, lookup: F) -> EngineResult<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_with_env(&content, &path_str, lookup)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_with_env<F>(content: &str, origin: &str, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        apply_env_overrides(&mut config, &lookup)?;
        Self::from_config(config)
    }

    /// Validates an already-built configuration.
    pub fn from_config(config: AppConfig) -> EngineResult<Self> {
        let time_zone = validate(&config)?;
        Ok(Self { config, time_zone })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// The validated pay period time zone.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// A pay period calculator for the configured anchor and zone.
    pub fn pay_period_calculator(&self) -> PayPeriodCalculator {
        PayPeriodCalculator::new(self.config.pay_period.anchor, self.time_zone)
    }
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: &F) -> EngineResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str, target: &mut String| {
        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            *target = value;
        }
    };

    set("WORKDAY_DB_HOST", &mut config.database.host);
    set("WORKDAY_DB_USER", &mut config.database.user);
    set("WORKDAY_DB_PASSWORD", &mut config.database.password);
    set("WORKDAY_DB_NAME", &mut config.database.name);
    set("WORKDAY_API_USER", &mut config.workday.user);
    set("WORKDAY_API_PASSWORD", &mut config.workday.password);
    set("WORKDAY_API_URL", &mut config.workday.base_url);
    set("WORKDAY_API_TENANT", &mut config.workday.tenant);

    if let Some(port) = lookup("WORKDAY_DB_PORT").filter(|v| !v.is_empty()) {
        config.database.port = port.parse().map_err(|_| EngineError::InvalidConfig {
            field: "WORKDAY_DB_PORT".to_string(),
            message: format!("not a port number: {port}"),
        })?;
    }

    if config.station.hostname.is_empty() {
        set("HOSTNAME", &mut config.station.hostname);
    }
    Ok(())
}

fn validate(config: &AppConfig) -> EngineResult<Tz> {
    let required = [
        ("database.host", &config.database.host),
        ("database.user", &config.database.user),
        ("database.name", &config.database.name),
        ("workday.base_url", &config.workday.base_url),
        ("workday.tenant", &config.workday.tenant),
        ("workday.user", &config.workday.user),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                field: field.to_string(),
                message: "must not be empty".to_string(),
            });
        }
    }

    if config.roster.backend == RosterBackend::Cache {
        let export = &config.roster.export;
        if export.worker_summary_url.trim().is_empty() || export.worker_position_url.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "roster.export".to_string(),
                message: "cache backend needs worker_summary_url and worker_position_url".to_string(),
            });
        }
        if config.roster.refresh_interval_hours == 0 {
            return Err(EngineError::InvalidConfig {
                field: "roster.refresh_interval_hours".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
    }

    if config.database.max_connections == 0 {
        return Err(EngineError::InvalidConfig {
            field: "database.max_connections".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    config
        .pay_period
        .time_zone
        .parse::<Tz>()
        .map_err(|e| EngineError::InvalidConfig {
            field: "pay_period.time_zone".to_string(),
            message: e.to_string(),
        })
}
