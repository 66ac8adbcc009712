// SPDX-License-Identifier: GPL-3.0-only

//! Phase timing metrics
//!
//! The sink is injected by whoever composes the controller, with an
//! explicit lifecycle. The controller reports how long the session spent
//! in each state; what happens to the numbers is the sink's business.

use std::time::Duration;
use tracing::debug;

/// Receiver for phase duration measurements
pub trait MetricsSink: Send {
    fn record_duration(&self, name: &'static str, elapsed: Duration);
}

/// Discards all measurements
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetrics;

impl MetricsSink for NullMetrics {
    fn record_duration(&self, _name: &'static str, _elapsed: Duration) {}
}

/// Reports measurements through `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMetrics;

impl MetricsSink for LogMetrics {
    fn record_duration(&self, name: &'static str, elapsed: Duration) {
        debug!(phase = name, elapsed_ms = elapsed.as_millis() as u64, "Phase timing");
    }
}
