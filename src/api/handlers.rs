//! HTTP request handlers for the Timeclock Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::PunchDraft;
use crate::telemetry::LogLevel;

use super::request::PunchRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employee/:id", get(employee_handler))
        .route("/punch/:id", post(punch_handler))
        .route("/punches/:id", get(punches_handler))
        .route("/healthz", get(|| async { Json(json!({ "message": "healthy" })) }))
        .route("/ping", get(|| async { Json(json!({ "message": "pong" })) }))
        .route("/status", get(|| async { Json(json!({ "message": "good" })) }))
        .route("/log-level", get(get_log_level_handler))
        .route("/log-level/:level", put(set_log_level_handler))
        .route("/roster/refresh", post(roster_refresh_handler))
        .with_state(state)
}

fn json_ok<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

/// Handler for GET /employee/{id}.
///
/// Returns the employee's positions, totals, punches and time blocks along
/// with the availability of every source.
async fn employee_handler(State(state): State<AppState>, Path(external_id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, external_id = %external_id, "Processing employee request");

    let start_time = Instant::now();
    match state.service().employee_snapshot(&external_id).await {
        Ok(snapshot) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %snapshot.employee.worker_id,
                degraded_sources = snapshot.errors.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Employee request completed"
            );
            json_ok(StatusCode::OK, snapshot)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Employee request failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /punch/{id}.
async fn punch_handler(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, external_id = %external_id, "Processing punch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response();
        }
    };

    let draft = match PunchDraft::try_from(request) {
        Ok(draft) => draft,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rejected punch");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    match state.service().record_punch(&external_id, draft).await {
        Ok(receipt) => {
            info!(
                correlation_id = %correlation_id,
                clock_event_type = %receipt.clock_event_type,
                punch_time = %receipt.punch_time,
                "Punch recorded"
            );
            json_ok(StatusCode::OK, receipt)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Punch could not be recorded");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /punches/{id}, keyed by worker id.
async fn punches_handler(State(state): State<AppState>, Path(worker_id): Path<String>) -> Response {
    match state.service().unreconciled_punches(&worker_id).await {
        Ok(punches) => json_ok(StatusCode::OK, punches),
        Err(err) => {
            warn!(worker_id = %worker_id, error = %err, "Could not read punches");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

async fn get_log_level_handler(State(state): State<AppState>) -> Response {
    json_ok(StatusCode::OK, json!({ "log_level": state.log_level().level() }))
}

async fn set_log_level_handler(State(state): State<AppState>, Path(level): Path<String>) -> Response {
    let result = level
        .parse::<LogLevel>()
        .and_then(|level| state.log_level().set_level(level).map(|()| level));
    match result {
        Ok(level) => {
            info!(log_level = %level, "Log level changed");
            json_ok(StatusCode::OK, json!({ "log_level": level }))
        }
        Err(err) => {
            warn!(error = %err, "Could not change log level");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /roster/refresh.
///
/// Wakes the refresh loop and returns immediately; the refresh itself runs
/// in the background.
async fn roster_refresh_handler(State(state): State<AppState>) -> Response {
    let Some(refresh) = state.roster_refresh() else {
        return ApiErrorResponse::new(
            StatusCode::CONFLICT,
            ApiError::new("NO_ROSTER_CACHE", "Employee lookups are not served from the roster cache"),
        )
        .into_response();
    };
    refresh.trigger.notify_one();
    let cached_records = refresh.cache.len().await;
    let refreshed_at = refresh.cache.refreshed_at().await;
    info!(cached_records, "Roster refresh requested");
    json_ok(
        StatusCode::ACCEPTED,
        json!({ "cached_records": cached_records, "refreshed_at": refreshed_at }),
    )
}
