// API module entry
// Routes elevator requests to the stop queue and writes the access log

mod error;
mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::USER_AGENT;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{AppState, HealthConfig};
use crate::logger::{self, AccessLogEntry};

use error::ApiError;

const STOPS_PATH: &str = "/api/elevator/stops";

/// Routes served by this API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    RequestElevator,
    RequestDestination,
    Stops,
    NextStop,
    Stop(i32),
    Health,
}

impl Endpoint {
    /// Match a request path; `Ok(None)` means no such route
    fn resolve(path: &str, health: &HealthConfig) -> Result<Option<Self>, ApiError> {
        let endpoint = match path {
            "/api/elevator/request" => Self::RequestElevator,
            "/api/elevator/destination" => Self::RequestDestination,
            STOPS_PATH => Self::Stops,
            "/api/elevator/next" => Self::NextStop,
            p if health.enabled && (p == health.liveness_path || p == health.readiness_path) => {
                Self::Health
            }
            p => match p.strip_prefix(STOPS_PATH).and_then(|rest| rest.strip_prefix('/')) {
                Some(raw) if !raw.is_empty() && !raw.contains('/') => {
                    let floor = raw
                        .parse::<i32>()
                        .map_err(|_| ApiError::InvalidFloorPath(raw.to_string()))?;
                    Self::Stop(floor)
                }
                _ => return Ok(None),
            },
        };
        Ok(Some(endpoint))
    }

    const fn allow(self) -> &'static str {
        match self {
            Self::RequestElevator | Self::RequestDestination => "POST, OPTIONS",
            Self::Stops | Self::NextStop | Self::Health => "GET, OPTIONS",
            Self::Stop(_) => "DELETE, OPTIONS",
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Never fails at the service level: every error becomes a JSON response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, peer_addr));
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = match route(req, &state).await {
        Ok(response) => response,
        Err(err) => {
            logger::log_request_rejected(
                method.as_str(),
                &path,
                err.status().as_u16(),
                &err.to_string(),
            );
            err.into_response()
        }
    };
    response::apply_common_headers(&mut response, &state.config.http);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route<B>(req: Request<B>, state: &AppState) -> handlers::ApiResult
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(endpoint) = Endpoint::resolve(req.uri().path(), &state.config.health)? else {
        return Err(ApiError::NotFound);
    };

    if req.method() == Method::OPTIONS {
        return Ok(response::options_response(
            endpoint.allow(),
            state.config.http.enable_cors,
        ));
    }

    let method = req.method().clone();
    let stops = &state.stops;
    let max_body_size = state.config.http.max_body_size;

    match (endpoint, &method) {
        (Endpoint::RequestElevator, &Method::POST) => {
            handlers::request_elevator(req, stops, max_body_size).await
        }
        (Endpoint::RequestDestination, &Method::POST) => {
            handlers::request_destination(req, stops, max_body_size).await
        }
        (Endpoint::Stops, &Method::GET) => handlers::list_stops(stops),
        (Endpoint::NextStop, &Method::GET) => handlers::next_stop(stops),
        (Endpoint::Stop(floor), &Method::DELETE) => handlers::service_stop(stops, floor),
        (Endpoint::Health, &Method::GET) => handlers::health(stops),
        (endpoint, _) => Err(ApiError::MethodNotAllowed {
            allow: endpoint.allow(),
        }),
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}
