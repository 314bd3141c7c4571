// API response utility functions module

use crate::config::HttpConfig;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from_static(
                    br#"{"error":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build {status} response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// 202 Accepted with a `Location` header pointing at the queued stop
pub fn accepted_response<T: Serialize>(location: &str, body: &T) -> Response<Full<Bytes>> {
    let mut response = json_response(StatusCode::ACCEPTED, body);
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(e) => logger::log_error(&format!("Invalid Location header '{location}': {e}")),
    }
    response
}

/// 204 response to a preflight `OPTIONS` request
pub fn options_response(allow: &'static str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, allow);

    if enable_cors {
        builder = builder
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, allow)
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
            .header(header::ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build OPTIONS response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

/// Headers every response carries
pub fn apply_common_headers(response: &mut Response<Full<Bytes>>, http: &HttpConfig) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http.server_name) {
        Ok(value) => {
            headers.insert(header::SERVER, value);
        }
        Err(e) => logger::log_warning(&format!(
            "Invalid server_name '{}': {e}",
            http.server_name
        )),
    }
    if http.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}
