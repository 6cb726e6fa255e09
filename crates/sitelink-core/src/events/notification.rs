//! User notification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{NotificationId, ProjectId};

/// A user-facing notification pushed by the backend.
///
/// The in-memory list kept by the client is an overlay; the backend remains
/// the authority for persisted read-state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification ID.
    pub id: NotificationId,
    /// Notification text.
    pub message: String,
    /// Project context (if the notification is project-scoped).
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Whether the notification has been read.
    #[serde(default)]
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}
