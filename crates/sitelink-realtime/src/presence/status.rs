//! Presence status definitions.

use serde::{Deserialize, Serialize};

/// A user's live status as observed through the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    /// User is connected and active.
    Online,
    /// User is connected but marked away.
    Away,
    /// User asked not to be disturbed.
    Busy,
    /// User is not connected.
    Offline,
}

impl PresenceStatus {
    /// Parses from a string with a default fallback.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "online" => Self::Online,
            "away" => Self::Away,
            "busy" => Self::Busy,
            _ => Self::Offline,
        }
    }

    /// Converts to string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }

    /// Whether the user has a live connection (any non-offline status).
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Offline)
    }
}
