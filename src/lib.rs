//! Timeclock Engine for Workday kiosks
//!
//! This crate backs a time clock kiosk: it resolves employees from the roster,
//! records punches in the local time clock database, and reconciles them with
//! the clock events and time blocks Workday reports to produce each
//! position's clock status and hour totals.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod sources;
pub mod telemetry;
