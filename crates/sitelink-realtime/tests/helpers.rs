//! Shared test harness driving the engine over the in-memory transport.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use sitelink_core::config::realtime::RealtimeConfig;
use sitelink_core::events::{ChatMessage, Notification, TaskUpdate, WorkflowAlert};
use sitelink_core::events::AlertPriority;
use sitelink_core::traits::auth::StaticTokenProvider;
use sitelink_core::traits::notifier::{
    DesktopNotification, DesktopNotifier, NotificationPermission,
};
use sitelink_core::types::id::{
    AlertId, ConversationId, MessageId, NotificationId, ProjectId, TaskId, UserId,
};
use sitelink_realtime::bus::Subscription;
use sitelink_realtime::transport::memory::{MemoryServer, MemoryTransport};
use sitelink_realtime::{ConnectionManager, EventKind, ServerEvent};

/// A manager wired to a scriptable in-memory backend.
pub struct TestHarness {
    pub manager: ConnectionManager,
    pub server: MemoryServer,
    pub auth: Arc<StaticTokenProvider>,
}

/// Config with short delays so reconnect tests run in milliseconds.
pub fn fast_config() -> RealtimeConfig {
    RealtimeConfig {
        connect_timeout_seconds: 1,
        send_timeout_seconds: 1,
        reconnect_base_delay_ms: 10,
        reconnect_max_delay_ms: 40,
        ..RealtimeConfig::default()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(fast_config())
    }

    pub fn with_config(config: RealtimeConfig) -> Self {
        let (transport, server) = MemoryTransport::new();
        let auth = Arc::new(StaticTokenProvider::new("test-token"));
        let manager = ConnectionManager::new(Arc::new(transport), auth.clone(), config);
        Self {
            manager,
            server,
            auth,
        }
    }

    pub async fn connect(&self) {
        self.manager.connect().await.expect("connect should succeed");
    }

    /// Push an event and wait for the reader task to route it.
    pub async fn push(&self, event: ServerEvent) {
        assert!(self.server.push(event).await, "no active link to push to");
        settle().await;
    }
}

/// Give spawned tasks a moment to run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

/// Collects every dispatched event of the watched kinds.
pub struct EventLog {
    events: Arc<Mutex<Vec<ServerEvent>>>,
    _subscriptions: Vec<Subscription>,
}

impl EventLog {
    pub fn capture(manager: &ConnectionManager, kinds: &[EventKind]) -> Self {
        let events: Arc<Mutex<Vec<ServerEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let subscriptions = kinds
            .iter()
            .map(|kind| {
                let events = events.clone();
                manager.on(*kind, move |event| {
                    events.lock().unwrap().push(event.clone());
                })
            })
            .collect();
        Self {
            events,
            _subscriptions: subscriptions,
        }
    }

    pub fn events(&self) -> Vec<ServerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.kind() == kind)
            .count()
    }
}

/// A desktop notifier that records what it was asked to raise.
#[derive(Debug)]
pub struct RecordingNotifier {
    permission: Mutex<NotificationPermission>,
    raised: Mutex<Vec<DesktopNotification>>,
}

impl RecordingNotifier {
    pub fn new(permission: NotificationPermission) -> Arc<Self> {
        Arc::new(Self {
            permission: Mutex::new(permission),
            raised: Mutex::new(Vec::new()),
        })
    }

    pub fn raised(&self) -> Vec<DesktopNotification> {
        self.raised.lock().unwrap().clone()
    }
}

impl DesktopNotifier for RecordingNotifier {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn notify(&self, notification: DesktopNotification) {
        self.raised.lock().unwrap().push(notification);
    }
}

pub fn task_update(project_id: ProjectId, title: &str) -> ServerEvent {
    ServerEvent::TaskUpdate(TaskUpdate {
        project_id,
        task_id: TaskId::new(),
        title: title.to_string(),
        status: "in_progress".to_string(),
        assignee_id: None,
        timestamp: Utc::now(),
    })
}

pub fn chat_message(conversation_id: ConversationId, body: &str) -> ServerEvent {
    ServerEvent::Message(ChatMessage {
        id: MessageId::new(),
        conversation_id,
        sender_id: UserId::new(),
        sender_name: "Dana".to_string(),
        body: body.to_string(),
        sent_at: Utc::now(),
    })
}

pub fn notification(message: &str) -> Notification {
    Notification {
        id: NotificationId::new(),
        message: message.to_string(),
        project_id: None,
        is_read: false,
        created_at: Utc::now(),
    }
}

pub fn workflow_alert(priority: AlertPriority) -> WorkflowAlert {
    WorkflowAlert {
        id: AlertId::new(),
        project_id: ProjectId::new(),
        step_title: "Inspection sign-off".to_string(),
        priority,
        acknowledged: false,
        created_at: Utc::now(),
    }
}
