//! Application state for the Timeclock Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::service::TimeclockService;
use crate::sources::RosterCache;
use crate::telemetry::LogLevelControl;

/// Shared application state.
///
/// Contains the employee service, the log level control and, when lookups
/// are served from memory, the roster cache and its refresh trigger.
#[derive(Clone)]
pub struct AppState {
    service: Arc<TimeclockService>,
    log_level: LogLevelControl,
    roster_refresh: Option<RosterRefresh>,
}

/// Handle on the roster cache's background refresh.
#[derive(Clone)]
pub struct RosterRefresh {
    /// The cache being refreshed.
    pub cache: Arc<RosterCache>,
    /// Wakes the refresh loop.
    pub trigger: Arc<Notify>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(service: TimeclockService, log_level: LogLevelControl) -> Self {
        Self {
            service: Arc::new(service),
            log_level,
            roster_refresh: None,
        }
    }

    /// Enables `POST /roster/refresh`.
    pub fn with_roster_refresh(mut self, cache: Arc<RosterCache>, trigger: Arc<Notify>) -> Self {
        self.roster_refresh = Some(RosterRefresh { cache, trigger });
        self
    }

    /// Returns the employee service.
    pub fn service(&self) -> &TimeclockService {
        &self.service
    }

    /// Returns the log level control.
    pub fn log_level(&self) -> &LogLevelControl {
        &self.log_level
    }

    /// Returns the roster refresh handle, if the cache backend is in use.
    pub fn roster_refresh(&self) -> Option<&RosterRefresh> {
        self.roster_refresh.as_ref()
    }
}
