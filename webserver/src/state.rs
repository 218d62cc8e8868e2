//! Webserver state shared by all handlers

use std::sync::Arc;
use std::time::Instant;

use generator::IconGenerator;

/// Read-only after startup; cloned into every request
#[derive(Clone)]
pub struct WebServerState {
    pub generator: IconGenerator,
    pub server_start_time: Arc<Instant>,
}

impl WebServerState {
    pub fn new(generator: IconGenerator) -> Self {
        Self {
            generator,
            server_start_time: Arc::new(Instant::now()),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.server_start_time.elapsed().as_secs()
    }
}
