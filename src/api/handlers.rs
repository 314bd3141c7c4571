// Elevator endpoint handlers
// Translate validated requests into stop queue operations

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Request, Response, StatusCode};

use super::error::ApiError;
use super::response::{accepted_response, json_response};
use super::types::{
    validate_floor, FloorRequest, HealthResponse, NextStopResponse, RequestDestinationResponse,
    RequestElevatorResponse, ServicedStopResponse, StopsResponse, STATUS_QUEUED, STATUS_SERVICED,
};
use crate::dispatch::StopQueue;
use crate::logger;

pub type ApiResult = Result<Response<Full<Bytes>>, ApiError>;

/// POST /api/elevator/request - hall call from a floor
pub async fn request_elevator<B>(req: Request<B>, stops: &StopQueue, max_body_size: u64) -> ApiResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let floor = read_floor_request(req, max_body_size).await?.validate()?;
    queue_stop(stops, "Hall call", floor);

    Ok(accepted_response(
        &format!("/api/elevator/requests/{floor}"),
        &RequestElevatorResponse {
            requested_floor: floor,
            status: STATUS_QUEUED.to_string(),
        },
    ))
}

/// POST /api/elevator/destination - floor selected inside the car
pub async fn request_destination<B>(
    req: Request<B>,
    stops: &StopQueue,
    max_body_size: u64,
) -> ApiResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let floor = read_floor_request(req, max_body_size).await?.validate()?;
    queue_stop(stops, "Destination", floor);

    Ok(accepted_response(
        &format!("/api/elevator/destinations/{floor}"),
        &RequestDestinationResponse {
            destination_floor: floor,
            status: STATUS_QUEUED.to_string(),
        },
    ))
}

/// GET /api/elevator/stops
pub fn list_stops(stops: &StopQueue) -> ApiResult {
    Ok(json_response(
        StatusCode::OK,
        &StopsResponse {
            stops: stops.list_stops(),
        },
    ))
}

/// GET /api/elevator/next
pub fn next_stop(stops: &StopQueue) -> ApiResult {
    Ok(json_response(
        StatusCode::OK,
        &NextStopResponse {
            next_stop: stops.next_stop(),
        },
    ))
}

/// DELETE /api/elevator/stops/{floor} - the car has serviced a floor
pub fn service_stop(stops: &StopQueue, floor: i32) -> ApiResult {
    let floor = validate_floor(floor)?;
    if !stops.remove_stop(floor) {
        return Err(ApiError::StopNotPending(floor));
    }
    logger::log_stop_serviced(floor, stops.len());

    Ok(json_response(
        StatusCode::OK,
        &ServicedStopResponse {
            serviced_floor: floor,
            status: STATUS_SERVICED.to_string(),
        },
    ))
}

/// Liveness and readiness probes
pub fn health(stops: &StopQueue) -> ApiResult {
    Ok(json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "ok".to_string(),
            pending_stops: stops.len(),
        },
    ))
}

fn queue_stop(stops: &StopQueue, source: &str, floor: i32) {
    let is_new = stops.add_stop(floor);
    logger::log_stop_queued(source, floor, is_new, stops.len());
}

/// Read and parse a `{ "floor": int }` body, bounded by `max_body_size`
async fn read_floor_request<B>(req: Request<B>, max_body_size: u64) -> Result<FloorRequest, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_content_length(&req, max_body_size)?;

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(ApiError::PayloadTooLarge { max: max_body_size });
        }
        Err(e) => return Err(ApiError::BodyUnreadable(e.to_string())),
    };

    serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Reject early when the declared Content-Length is already too large
fn check_content_length<B>(req: &Request<B>, max_body_size: u64) -> Result<(), ApiError> {
    let Some(content_length) = req.headers().get(CONTENT_LENGTH) else {
        return Ok(());
    };
    match content_length.to_str().map(str::parse::<u64>) {
        Ok(Ok(size)) if size > max_body_size => {
            Err(ApiError::PayloadTooLarge { max: max_body_size })
        }
        Ok(Ok(_)) => Ok(()),
        _ => {
            logger::log_warning("Invalid Content-Length header, relying on body limit");
            Ok(())
        }
    }
}
