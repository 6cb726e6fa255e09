//! Connection status definitions.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the managed connection.
///
/// Legal transitions within one connect/disconnect cycle:
/// `Disconnected → Connecting → Connected`,
/// `Connected → Reconnecting → Connected | Disconnected`.
/// A failed first dial also moves `Connecting → Reconnecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No link and no attempt in progress.
    Disconnected,
    /// First dial of a cycle in progress.
    Connecting,
    /// Link is live.
    Connected,
    /// Link lost; retry loop running.
    Reconnecting,
}

impl ConnectionStatus {
    /// Whether moving to `next` is a legal transition.
    pub fn can_transition(self, next: ConnectionStatus) -> bool {
        use ConnectionStatus::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Reconnecting)
                | (Connecting, Disconnected)
                | (Connected, Reconnecting)
                | (Connected, Disconnected)
                | (Reconnecting, Connected)
                | (Reconnecting, Disconnected)
        )
    }

    /// Whether a dial is in progress or a link is live.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Convert to string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
        }
    }
}
