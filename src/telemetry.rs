//! Logging setup and runtime log level control.
//!
//! The subscriber's filter sits behind a `reload` layer so `PUT /log-level`
//! can change verbosity without restarting the kiosk.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{EngineError, EngineResult};

/// Levels the kiosk may switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-block reconciliation detail.
    Debug,
    /// Requests and source status.
    Info,
    /// Degraded sources and skipped records.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// The lowercase name, as accepted by [`EnvFilter`].
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warn => 2,
            LogLevel::Error => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(EngineError::InvalidLogLevel {
                level: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and changes the active log level.
#[derive(Debug, Clone)]
pub struct LogLevelControl {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    current: Arc<AtomicU8>,
}

impl LogLevelControl {
    /// A control that only records the level, for use without a global
    /// subscriber.
    pub fn detached(level: LogLevel) -> Self {
        Self {
            handle: None,
            current: Arc::new(AtomicU8::new(level.to_u8())),
        }
    }

    /// The active level.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.current.load(Ordering::Relaxed))
    }

    /// Switches the active level.
    pub fn set_level(&self, level: LogLevel) -> EngineResult<()> {
        if let Some(handle) = &self.handle {
            handle
                .reload(EnvFilter::new(level.as_str()))
                .map_err(|err| EngineError::InvalidConfig {
                    field: "logging.level".to_string(),
                    message: err.to_string(),
                })?;
        }
        self.current.store(level.to_u8(), Ordering::Relaxed);
        Ok(())
    }
}

/// Installs the global subscriber.
///
/// `override_level` (from the command line) wins over the configured level.
pub fn init(config: &LoggingConfig, override_level: Option<&str>) -> EngineResult<LogLevelControl> {
    let level: LogLevel = override_level.unwrap_or(&config.level).parse()?;
    let (filter, handle) = reload::Layer::new(EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Plain => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    installed.map_err(|err| EngineError::InvalidConfig {
        field: "logging".to_string(),
        message: err.to_string(),
    })?;

    Ok(LogLevelControl {
        handle: Some(handle),
        current: Arc::new(AtomicU8::new(level.to_u8())),
    })
}
