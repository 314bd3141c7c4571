// Server loop module
// Accepts connections until shutdown, then drains in-flight requests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::{accept_connection, connection_timeout};
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Main accept loop
///
/// Must run inside a `LocalSet`: each connection is served by a local task.
/// Returns once `state.shutdown_signal` fires and open connections have
/// finished or the connection timeout has elapsed.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let local_addr = listener.local_addr()?;

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection on {local_addr}: {e}"));
                    }
                }
            }

            () = state.shutdown_signal.notified() => {
                break;
            }
        }
    }

    // Stop accepting before draining
    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    drain_connections(&active_connections, connection_timeout(&state)).await;
    Ok(())
}

/// Wait until every active connection has finished, up to `deadline`.
///
/// Connections still open after the deadline are abandoned with the runtime.
async fn drain_connections(active_connections: &AtomicUsize, deadline: Duration) {
    let drain_deadline = tokio::time::Instant::now() + deadline;

    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info("All connections drained");
            return;
        }

        tokio::select! {
            () = tokio::time::sleep(DRAIN_POLL_INTERVAL) => {}
            () = tokio::time::sleep_until(drain_deadline) => {
                logger::log_warning(&format!(
                    "Drain deadline reached with {remaining} connection(s) still open"
                ));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_config() -> Config {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.logging.access_log = false;
        cfg
    }

    async fn raw_request(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    #[tokio::test]
    async fn test_serves_requests_until_shutdown() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let cfg = test_config();
                let listener = create_reusable_listener(cfg.get_socket_addr().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let state = Arc::new(AppState::new(&cfg));
                let counter = Arc::new(AtomicUsize::new(0));
                let server = tokio::task::spawn_local(run_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&counter),
                ));

                let response = raw_request(
                    addr,
                    "POST /api/elevator/request HTTP/1.1\r\nHost: localhost\r\n\
                     Content-Type: application/json\r\nContent-Length: 11\r\n\
                     Connection: close\r\n\r\n{\"floor\":4}",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 202"), "{response}");
                assert!(response.contains(r#"{"requestedFloor":4,"status":"queued"}"#));

                let response = raw_request(
                    addr,
                    "GET /api/elevator/next HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 200"), "{response}");
                assert!(response.ends_with(r#"{"nextStop":4}"#));

                state.shutdown_signal.notify_one();
                server.await.unwrap().unwrap();
                assert_eq!(counter.load(Ordering::SeqCst), 0);
                assert_eq!(state.stops.list_stops(), vec![4]);
            })
            .await;
    }

    #[tokio::test]
    async fn test_connections_over_limit_are_dropped() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let mut cfg = test_config();
                cfg.performance.max_connections = Some(0);
                let listener = create_reusable_listener(cfg.get_socket_addr().unwrap()).unwrap();
                let addr = listener.local_addr().unwrap();
                let state = Arc::new(AppState::new(&cfg));
                let counter = Arc::new(AtomicUsize::new(0));
                let server = tokio::task::spawn_local(run_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&counter),
                ));

                let mut stream = TcpStream::connect(addr).await.unwrap();
                let _ = stream
                    .write_all(b"GET /api/elevator/stops HTTP/1.1\r\nHost: localhost\r\n\r\n")
                    .await;
                let mut response = Vec::new();
                let _ = stream.read_to_end(&mut response).await;
                assert!(response.is_empty());
                assert!(state.stops.is_empty());

                state.shutdown_signal.notify_one();
                server.await.unwrap().unwrap();
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_returns_at_deadline() {
        let counter = AtomicUsize::new(1);
        let started = std::time::Instant::now();
        drain_connections(&counter, Duration::from_millis(50)).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
