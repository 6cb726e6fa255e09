//! Connection-scoped notification list with an unread counter.

use std::sync::{Arc, Mutex};

use tracing::debug;

use sitelink_core::config::realtime::NotificationsConfig;
use sitelink_core::events::Notification;
use sitelink_core::traits::notifier::{
    DesktopNotification, DesktopNotifier, NotificationPermission,
};
use sitelink_core::types::id::NotificationId;

use crate::bus::Subscription;
use crate::connection::manager::ConnectionManager;
use crate::event::{EventKind, ServerEvent};

/// Global list of user notifications, newest first, with an unread count.
///
/// Read-state mutations here are optimistic overlays; reconciling with the
/// backend's persisted read-state is the REST layer's job.
#[derive(Debug)]
pub struct NotificationStream {
    state: Arc<Mutex<NotificationState>>,
    _subscription: Subscription,
}

#[derive(Debug)]
struct NotificationState {
    entries: Vec<Notification>,
    unread: usize,
    max_retained: usize,
}

impl NotificationStream {
    /// Attach to a connection, raising OS notifications through `notifier`
    /// when permitted.
    pub fn attach(
        manager: &ConnectionManager,
        notifier: Arc<dyn DesktopNotifier>,
        config: NotificationsConfig,
    ) -> Self {
        let state = Arc::new(Mutex::new(NotificationState {
            entries: Vec::new(),
            unread: 0,
            max_retained: config.max_retained.max(1),
        }));

        let subscription = {
            let state = state.clone();
            let desktop_enabled = config.desktop_enabled;
            manager.on(EventKind::Notification, move |event| {
                if let ServerEvent::Notification(notification) = event {
                    Self::ingest(&state, notification);
                    if desktop_enabled
                        && notifier.permission() == NotificationPermission::Granted
                    {
                        notifier.notify(DesktopNotification {
                            title: "SiteLink".to_string(),
                            body: notification.message.clone(),
                            tag: notification.id.to_string(),
                        });
                    }
                }
            })
        };

        Self {
            state,
            _subscription: subscription,
        }
    }

    fn ingest(state: &Arc<Mutex<NotificationState>>, notification: &Notification) {
        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        if !notification.is_read {
            state.unread += 1;
        }
        state.entries.insert(0, notification.clone());

        while state.entries.len() > state.max_retained {
            if let Some(evicted) = state.entries.pop() {
                if !evicted.is_read {
                    state.unread = state.unread.saturating_sub(1);
                }
                debug!(id = %evicted.id, "Evicted oldest notification past retention cap");
            }
        }
    }

    /// Mark one notification as read. Idempotent; the unread counter drops
    /// by at most one and never below zero. Returns whether state changed.
    pub fn mark_as_read(&self, id: NotificationId) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.is_read => {
                entry.is_read = true;
                state.unread = state.unread.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Mark every notification as read and zero the counter.
    pub fn mark_all_as_read(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for entry in &mut state.entries {
            entry.is_read = true;
        }
        state.unread = 0;
    }

    /// Drop every notification and zero the counter.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.clear();
        state.unread = 0;
    }

    /// Current unread count.
    pub fn unread_count(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).unread
    }

    /// Snapshot of notifications, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clone()
    }
}
