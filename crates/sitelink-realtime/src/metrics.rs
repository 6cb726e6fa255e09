//! Engine counters for diagnostics surfaces.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lightweight atomic counters maintained by the connection manager.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Successful dials (initial connects and reconnects).
    pub connects_total: AtomicU64,
    /// Reconnect attempts made.
    pub reconnect_attempts_total: AtomicU64,
    /// Events received from the transport.
    pub events_received: AtomicU64,
    /// Messages delivered with acknowledgment.
    pub messages_sent: AtomicU64,
    /// Messages rejected or timed out.
    pub messages_failed: AtomicU64,
}

/// A point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Successful dials.
    pub connects_total: u64,
    /// Reconnect attempts made.
    pub reconnect_attempts_total: u64,
    /// Events received from the transport.
    pub events_received: u64,
    /// Messages delivered with acknowledgment.
    pub messages_sent: u64,
    /// Messages rejected or timed out.
    pub messages_failed: u64,
}

impl EngineMetrics {
    /// Record a successful dial.
    pub fn record_connect(&self) {
        self.connects_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reconnect attempt.
    pub fn record_reconnect_attempt(&self) {
        self.reconnect_attempts_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a received event.
    pub fn record_event(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an acknowledged send.
    pub fn record_send(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed send.
    pub fn record_send_failure(&self) {
        self.messages_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connects_total: self.connects_total.load(Ordering::Relaxed),
            reconnect_attempts_total: self.reconnect_attempts_total.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_failed: self.messages_failed.load(Ordering::Relaxed),
        }
    }
}
