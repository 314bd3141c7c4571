// API types module
// Request and response bodies of the elevator endpoints

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Status reported for a stop that was accepted into the queue
pub const STATUS_QUEUED: &str = "queued";

/// Status reported for a stop removed from the queue
pub const STATUS_SERVICED: &str = "serviced";

/// Body of `POST /api/elevator/request` and `POST /api/elevator/destination`
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct FloorRequest {
    pub floor: i32,
}

impl FloorRequest {
    /// Floors are numbered from 1
    pub const fn validate(self) -> Result<i32, ApiError> {
        validate_floor(self.floor)
    }
}

pub const fn validate_floor(floor: i32) -> Result<i32, ApiError> {
    if floor < 1 {
        Err(ApiError::InvalidFloor)
    } else {
        Ok(floor)
    }
}

/// Hall call accepted
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestElevatorResponse {
    pub requested_floor: i32,
    pub status: String,
}

/// In-cab destination accepted
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestDestinationResponse {
    pub destination_floor: i32,
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StopsResponse {
    /// Ascending, deduplicated
    pub stops: Vec<i32>,
}

/// `nextStop` is serialized as `null` when the queue is empty
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NextStopResponse {
    pub next_stop: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServicedStopResponse {
    pub serviced_floor: i32,
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub pending_stops: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
