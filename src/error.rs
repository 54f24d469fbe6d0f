//! Error types for the Timeclock Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving employees,
//! reading punches and reconciling time blocks.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The external collaborators the engine reads from or writes to.
///
/// Used to tag [`EngineError::SourceUnavailable`] so that callers can report
/// which source went offline alongside any data that was still obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The employee roster (TCD `employee_cache` table or the in-memory cache).
    Roster,
    /// The time entry code reference table.
    TimeEntryCodes,
    /// The local time clock database event table.
    PunchStore,
    /// The Workday custom time reports.
    WorkdayApi,
    /// The Workday calculated time blocks service.
    CalculatedTimeBlocks,
    /// The bulk roster export used to refresh the roster cache.
    RosterExport,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::Roster => "roster",
            DataSource::TimeEntryCodes => "time entry codes",
            DataSource::PunchStore => "punch store",
            DataSource::WorkdayApi => "workday api",
            DataSource::CalculatedTimeBlocks => "calculated time blocks",
            DataSource::RosterExport => "roster export",
        };
        f.write_str(name)
    }
}

/// The main error type for the Timeclock Engine.
///
/// # Example
///
/// ```
/// use timeclock_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "employee".to_string(),
///     id: "123456789".to_string(),
/// };
/// assert_eq!(error.to_string(), "employee not found: 123456789");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested employee (or another keyed entity) does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// The identifier that had no match.
        id: String,
    },

    /// A collaborator was unreachable, timed out or answered with an error.
    #[error("{origin} unavailable: {message}")]
    SourceUnavailable {
        /// The source that failed.
        origin: DataSource,
        /// A description of the failure.
        message: String,
    },

    /// A record could not be parsed into the expected shape.
    #[error("Malformed {record}: {message}")]
    MalformedRecord {
        /// The kind of record that failed to parse.
        record: String,
        /// A description of the parse failure.
        message: String,
    },

    /// The time entry code reference table could not be read.
    #[error("Time entry code lookup failed: {message}")]
    LookupFailure {
        /// A description of the lookup failure.
        message: String,
    },

    /// A derived value could not be computed and was defaulted.
    #[error("Could not compute {what}: {message}")]
    ComputationSkipped {
        /// The value that was skipped.
        what: String,
        /// Why it could not be computed.
        message: String,
    },

    /// A punch submitted by the kiosk was invalid.
    #[error("Invalid punch field '{field}': {message}")]
    InvalidPunch {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was present but unusable.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The configuration key.
        field: String,
        /// A description of what made it invalid.
        message: String,
    },

    /// The HTTP listener could not be bound or stopped serving.
    #[error("Server failure on {addr}: {message}")]
    ServerFailure {
        /// The listen address.
        addr: String,
        /// A description of the I/O failure.
        message: String,
    },

    /// An unknown log level was requested.
    #[error("the log level must be one of (debug, info, warn, error), received {level}")]
    InvalidLogLevel {
        /// The rejected level.
        level: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::SourceUnavailable`] built from any displayable cause.
    pub fn unavailable(source: DataSource, cause: impl fmt::Display) -> Self {
        EngineError::SourceUnavailable {
            origin: source,
            message: cause.to_string(),
        }
    }

    /// Shorthand for a [`EngineError::MalformedRecord`] built from any displayable cause.
    pub fn malformed(record: impl Into<String>, cause: impl fmt::Display) -> Self {
        EngineError::MalformedRecord {
            record: record.into(),
            message: cause.to_string(),
        }
    }

    /// Returns the source this error should be attributed to, if any.
    pub fn source_kind(&self) -> Option<DataSource> {
        match self {
            EngineError::SourceUnavailable { origin, .. } => Some(*origin),
            EngineError::LookupFailure { .. } => Some(DataSource::TimeEntryCodes),
            _ => None,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
