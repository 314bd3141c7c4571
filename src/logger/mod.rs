//! Logger module
//!
//! Provides logging utilities for the dispatch server including:
//! - Server lifecycle logging
//! - Stop queue events
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        Level::parse(&config.logging.level),
    )
}

fn write_info(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_info(level, message),
        None => println!("{message}"),
    }
}

fn write_error(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_error(level, message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info(Level::Info, "======================================");
    write_info(Level::Info, "Elevator dispatch server started");
    write_info(Level::Info, &format!("Listening on: http://{addr}"));
    write_info(Level::Info, &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(Level::Info, &format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(Level::Info, &format!("Error log: {path}"));
    }
    write_info(Level::Info, "  - POST   /api/elevator/request");
    write_info(Level::Info, "  - POST   /api/elevator/destination");
    write_info(Level::Info, "  - GET    /api/elevator/stops");
    write_info(Level::Info, "  - GET    /api/elevator/next");
    write_info(Level::Info, "  - DELETE /api/elevator/stops/{floor}");
    write_info(Level::Info, "======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(Level::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_stop_queued(source: &str, floor: i32, is_new: bool, pending: usize) {
    if is_new {
        write_info(
            Level::Info,
            &format!("[Dispatch] {source} queued floor {floor} ({pending} pending)"),
        );
    } else {
        write_info(
            Level::Debug,
            &format!("[Dispatch] {source} for floor {floor} already pending"),
        );
    }
}

pub fn log_stop_serviced(floor: i32, pending: usize) {
    write_info(
        Level::Info,
        &format!("[Dispatch] Floor {floor} serviced ({pending} pending)"),
    );
}

pub fn log_request_rejected(method: &str, path: &str, status: u16, reason: &str) {
    write_error(
        Level::Warn,
        &format!("[Rejected] {method} {path} - {status}: {reason}"),
    );
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown(active_connections: usize) {
    write_info(
        Level::Info,
        &format!("[Shutdown] Listener closed, {active_connections} connection(s) still finishing"),
    );
}
