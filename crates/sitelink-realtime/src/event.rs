//! The typed union of events flowing through the engine.
//!
//! Wire events arrive from the transport as tagged JSON; lifecycle events
//! (`connected`, `disconnected`, `reconnect_attempt`, `reconnected`) are
//! emitted locally by the connection manager. Both travel the same bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitelink_core::events::{
    ActivityEntry, ChatMessage, Notification, PhaseOverride, ProgressUpdate, ProjectUpdate,
    TaskUpdate, TypingSignal, WorkflowAlert, WorkflowAlertPatch,
};
use sitelink_core::types::id::{AlertId, UserId};

use crate::presence::status::PresenceStatus;

/// Every event the engine can dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The connection was established.
    Connected,
    /// The connection was torn down deliberately.
    Disconnected,
    /// A reconnect attempt is about to be made.
    ReconnectAttempt {
        /// 1-based attempt number since the link was lost.
        attempt: u32,
    },
    /// The connection recovered after one or more reconnect attempts.
    Reconnected,
    /// A project update arrived.
    ProjectUpdate(ProjectUpdate),
    /// A project progress update arrived.
    ProgressUpdate(ProgressUpdate),
    /// A task update arrived.
    TaskUpdate(TaskUpdate),
    /// A project activity entry arrived.
    Activity(ActivityEntry),
    /// A workflow phase override arrived.
    PhaseOverride(PhaseOverride),
    /// A chat message arrived.
    Message(ChatMessage),
    /// A typing indicator changed.
    Typing(TypingSignal),
    /// A user notification arrived.
    Notification(Notification),
    /// A workflow alert was raised.
    WorkflowAlert(WorkflowAlert),
    /// A partial update to an existing workflow alert.
    WorkflowAlertUpdate(WorkflowAlertPatch),
    /// A workflow alert was dismissed server-side.
    WorkflowAlertDismissed {
        /// The dismissed alert.
        id: AlertId,
    },
    /// Another user's presence changed.
    PresenceChange {
        /// The user whose presence changed.
        user_id: UserId,
        /// The new status.
        status: PresenceStatus,
        /// When the change was observed by the server.
        timestamp: DateTime<Utc>,
    },
}

/// Discriminant of [`ServerEvent`], used as the bus routing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `connected`
    Connected,
    /// `disconnected`
    Disconnected,
    /// `reconnect_attempt`
    ReconnectAttempt,
    /// `reconnected`
    Reconnected,
    /// `project_update`
    ProjectUpdate,
    /// `progress_update`
    ProgressUpdate,
    /// `task_update`
    TaskUpdate,
    /// `activity`
    Activity,
    /// `phase_override`
    PhaseOverride,
    /// `message`
    Message,
    /// `typing`
    Typing,
    /// `notification`
    Notification,
    /// `workflow_alert`
    WorkflowAlert,
    /// `workflow_alert_update`
    WorkflowAlertUpdate,
    /// `workflow_alert_dismissed`
    WorkflowAlertDismissed,
    /// `presence_change`
    PresenceChange,
}

impl ServerEvent {
    /// The routing key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Disconnected => EventKind::Disconnected,
            Self::ReconnectAttempt { .. } => EventKind::ReconnectAttempt,
            Self::Reconnected => EventKind::Reconnected,
            Self::ProjectUpdate(_) => EventKind::ProjectUpdate,
            Self::ProgressUpdate(_) => EventKind::ProgressUpdate,
            Self::TaskUpdate(_) => EventKind::TaskUpdate,
            Self::Activity(_) => EventKind::Activity,
            Self::PhaseOverride(_) => EventKind::PhaseOverride,
            Self::Message(_) => EventKind::Message,
            Self::Typing(_) => EventKind::Typing,
            Self::Notification(_) => EventKind::Notification,
            Self::WorkflowAlert(_) => EventKind::WorkflowAlert,
            Self::WorkflowAlertUpdate(_) => EventKind::WorkflowAlertUpdate,
            Self::WorkflowAlertDismissed { .. } => EventKind::WorkflowAlertDismissed,
            Self::PresenceChange { .. } => EventKind::PresenceChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_events_deserialize_from_tagged_json() {
        let json = r#"{"type":"workflow_alert_dismissed","id":"6f9619ff-8b86-d011-b42d-00c04fc964ff"}"#;
        let event: ServerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind(), EventKind::WorkflowAlertDismissed);
    }

    #[test]
    fn lifecycle_events_round_trip() {
        let event = ServerEvent::ReconnectAttempt { attempt: 3 };
        let json = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
