// API error module
// Every way a request can be refused, and the response it maps to

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::fmt;

use super::response::json_response;
use super::types::ErrorResponse;

/// Request-level failure; never affects the stop queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Floor below 1
    InvalidFloor,
    /// Floor segment of a path is not an integer
    InvalidFloorPath(String),
    /// Body is not a valid JSON floor request
    MalformedBody(String),
    /// Body could not be read from the connection
    BodyUnreadable(String),
    PayloadTooLarge { max: u64 },
    StopNotPending(i32),
    NotFound,
    MethodNotAllowed { allow: &'static str },
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFloor
            | Self::InvalidFloorPath(_)
            | Self::MalformedBody(_)
            | Self::BodyUnreadable(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::StopNotPending(_) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// JSON `{ "error": ... }` response for this error
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = json_response(
            self.status(),
            &ErrorResponse {
                error: self.to_string(),
            },
        );
        if let Self::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(hyper::header::ALLOW, hyper::header::HeaderValue::from_static(allow));
        }
        response
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFloor => write!(f, "Floor must be >= 1"),
            Self::InvalidFloorPath(raw) => write!(f, "Invalid floor '{raw}'"),
            Self::MalformedBody(e) => write!(f, "Invalid request body: {e}"),
            Self::BodyUnreadable(e) => write!(f, "Failed to read request body: {e}"),
            Self::PayloadTooLarge { max } => write!(f, "Request body exceeds {max} bytes"),
            Self::StopNotPending(floor) => write!(f, "Floor {floor} is not pending"),
            Self::NotFound => write!(f, "Not Found"),
            Self::MethodNotAllowed { .. } => write!(f, "Method Not Allowed"),
        }
    }
}

impl std::error::Error for ApiError {}
