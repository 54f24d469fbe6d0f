//! HTTP API module for the Timeclock Engine.
//!
//! This module provides the REST endpoints the kiosk UI calls to look up
//! employees, record punches and list punches awaiting upload, plus the
//! operational endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::PunchRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, RosterRefresh};
