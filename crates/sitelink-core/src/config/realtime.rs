//! Real-time client engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time connection and stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Timeout for a single connection attempt in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Timeout for message delivery acknowledgment in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
    /// Base delay before the first reconnect attempt in milliseconds.
    #[serde(default = "default_reconnect_base_delay")]
    pub reconnect_base_delay_ms: u64,
    /// Upper bound on the reconnect backoff delay in milliseconds.
    #[serde(default = "default_reconnect_max_delay")]
    pub reconnect_max_delay_ms: u64,
    /// Number of events retained per room stream (most recent first).
    #[serde(default = "default_room_buffer")]
    pub room_buffer_capacity: usize,
    /// Seconds after which a typing indicator expires without a stop signal.
    #[serde(default = "default_typing_expiry")]
    pub typing_expiry_seconds: u64,
    /// Notification-specific settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Notification stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Whether to raise OS-level notifications (still gated on permission).
    #[serde(default = "default_true")]
    pub desktop_enabled: bool,
    /// Maximum notifications retained in memory; oldest are evicted.
    #[serde(default = "default_max_retained")]
    pub max_retained: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: default_connect_timeout(),
            send_timeout_seconds: default_send_timeout(),
            reconnect_base_delay_ms: default_reconnect_base_delay(),
            reconnect_max_delay_ms: default_reconnect_max_delay(),
            room_buffer_capacity: default_room_buffer(),
            typing_expiry_seconds: default_typing_expiry(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            desktop_enabled: true,
            max_retained: default_max_retained(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_send_timeout() -> u64 {
    10
}

fn default_reconnect_base_delay() -> u64 {
    500
}

fn default_reconnect_max_delay() -> u64 {
    30_000
}

fn default_room_buffer() -> usize {
    50
}

fn default_typing_expiry() -> u64 {
    8
}

fn default_true() -> bool {
    true
}

fn default_max_retained() -> usize {
    500
}
