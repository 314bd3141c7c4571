// Application state module
// Shared configuration, stop queue and lock-free config cache

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::dispatch::StopQueue;

/// Application state
pub struct AppState {
    pub config: Config,

    /// Pending stops, one queue per process
    pub stops: Arc<StopQueue>,

    /// Notified once when the process should stop accepting connections
    pub shutdown_signal: Arc<Notify>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Create state with an empty stop queue
    pub fn new(config: &Config) -> Self {
        Self::with_queue(config, Arc::new(StopQueue::new()))
    }

    /// Create state around an existing queue
    pub fn with_queue(config: &Config, stops: Arc<StopQueue>) -> Self {
        Self {
            config: config.clone(),
            stops,
            shutdown_signal: Arc::new(Notify::new()),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
