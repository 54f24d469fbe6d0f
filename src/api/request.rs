//! Request types for the Timeclock Engine API.
//!
//! This module defines the JSON request body for the `/punch/{id}` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ClockEventType, PunchDraft};

/// Request body for the `/punch/{id}` endpoint.
///
/// Any timestamp the kiosk sends is ignored; the server records its own time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// The Workday worker identifier.
    pub worker_id: String,
    /// The position being clocked.
    pub position_number: String,
    /// `IN`/`OUT` or `Check-in`/`Check-out`.
    pub clock_event_type: String,
    /// Backend time entry code reference.
    #[serde(default)]
    pub time_entry_code: String,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl TryFrom<PunchRequest> for PunchDraft {
    type Error = EngineError;

    fn try_from(req: PunchRequest) -> EngineResult<Self> {
        let worker_id = required("worker_id", req.worker_id)?;
        let position_number = required("position_number", req.position_number)?;
        let clock_event_type =
            ClockEventType::parse(&req.clock_event_type).ok_or_else(|| EngineError::InvalidPunch {
                field: "clock_event_type".to_string(),
                message: format!("expected IN or OUT, got {:?}", req.clock_event_type),
            })?;

        Ok(PunchDraft {
            worker_id,
            position_number,
            clock_event_type,
            time_entry_code: req.time_entry_code.trim().to_string(),
            comment: req.comment.unwrap_or_default(),
        })
    }
}

fn required(field: &str, value: String) -> EngineResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidPunch {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(clock_event_type: &str) -> PunchRequest {
        PunchRequest {
            worker_id: " W100 ".to_string(),
            position_number: "P1".to_string(),
            clock_event_type: clock_event_type.to_string(),
            time_entry_code: "TC_REG".to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_deserialize_kiosk_punch() {
        let json = r#"{
            "worker_id": "W100",
            "position_number": "P1",
            "clock_event_type": "IN",
            "time_entry_code": "TC_REG",
            "comment": "",
            "time_clock_event_date_time": "2024-01-10T08:00:00-07:00"
        }"#;
        let request: PunchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.worker_id, "W100");
        assert_eq!(request.comment.as_deref(), Some(""));
    }

    #[test]
    fn test_valid_request_becomes_draft() {
        let draft = PunchDraft::try_from(request("Check-out")).unwrap();
        assert_eq!(draft.worker_id, "W100");
        assert_eq!(draft.clock_event_type, ClockEventType::Out);
        assert!(draft.comment.is_empty());
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        match PunchDraft::try_from(request("LUNCH")) {
            Err(EngineError::InvalidPunch { field, .. }) => assert_eq!(field, "clock_event_type"),
            other => panic!("Expected InvalidPunch, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_position_is_rejected() {
        let mut req = request("IN");
        req.position_number = "  ".to_string();
        match PunchDraft::try_from(req) {
            Err(EngineError::InvalidPunch { field, .. }) => assert_eq!(field, "position_number"),
            other => panic!("Expected InvalidPunch, got {other:?}"),
        }
    }
}
