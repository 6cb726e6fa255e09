//! Workflow alerts with acknowledge/dismiss semantics.
//!
//! Acknowledge marks an alert as seen and keeps it; dismiss removes it
//! from the local view entirely. The two axes are independent: an alert
//! can be dismissed without ever being acknowledged.

use std::sync::{Arc, Mutex};

use tracing::trace;

use sitelink_core::events::{WorkflowAlert, WorkflowAlertPatch};
use sitelink_core::traits::notifier::{
    DesktopNotification, DesktopNotifier, NotificationPermission,
};
use sitelink_core::types::id::AlertId;

use crate::bus::Subscription;
use crate::connection::manager::ConnectionManager;
use crate::event::{EventKind, ServerEvent};

/// Global list of workflow alerts pushed by the server.
#[derive(Debug)]
pub struct WorkflowAlertStream {
    alerts: Arc<Mutex<Vec<WorkflowAlert>>>,
    _subscriptions: Vec<Subscription>,
}

impl WorkflowAlertStream {
    /// Attach to a connection, raising OS notifications for high and
    /// urgent alerts through `notifier` when permitted.
    pub fn attach(manager: &ConnectionManager, notifier: Arc<dyn DesktopNotifier>) -> Self {
        let alerts: Arc<Mutex<Vec<WorkflowAlert>>> = Arc::new(Mutex::new(Vec::new()));

        let created_sub = {
            let alerts = alerts.clone();
            manager.on(EventKind::WorkflowAlert, move |event| {
                if let ServerEvent::WorkflowAlert(alert) = event {
                    alerts
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .insert(0, alert.clone());

                    if alert.priority.warrants_desktop_alert()
                        && notifier.permission() == NotificationPermission::Granted
                    {
                        notifier.notify(DesktopNotification {
                            title: format!("Workflow alert ({})", alert.priority.as_str()),
                            body: format!(
                                "Project {}: {}",
                                alert.project_id, alert.step_title
                            ),
                            tag: alert.id.to_string(),
                        });
                    }
                }
            })
        };
        let updated_sub = {
            let alerts = alerts.clone();
            manager.on(EventKind::WorkflowAlertUpdate, move |event| {
                if let ServerEvent::WorkflowAlertUpdate(patch) = event {
                    Self::merge_patch(&alerts, patch);
                }
            })
        };
        let dismissed_sub = {
            let alerts = alerts.clone();
            manager.on(EventKind::WorkflowAlertDismissed, move |event| {
                if let ServerEvent::WorkflowAlertDismissed { id } = event {
                    alerts
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .retain(|alert| alert.id != *id);
                }
            })
        };

        Self {
            alerts,
            _subscriptions: vec![created_sub, updated_sub, dismissed_sub],
        }
    }

    /// Merge a partial patch into the matching alert. Unknown ids are a
    /// benign race (update arrived after a dismiss) and are dropped.
    fn merge_patch(alerts: &Arc<Mutex<Vec<WorkflowAlert>>>, patch: &WorkflowAlertPatch) {
        let mut alerts = alerts.lock().unwrap_or_else(|e| e.into_inner());
        match alerts.iter_mut().find(|alert| alert.id == patch.id) {
            Some(alert) => {
                if let Some(step_title) = &patch.step_title {
                    alert.step_title = step_title.clone();
                }
                if let Some(priority) = patch.priority {
                    alert.priority = priority;
                }
                if let Some(acknowledged) = patch.acknowledged {
                    alert.acknowledged = acknowledged;
                }
            }
            None => trace!(id = %patch.id, "Ignoring update for unknown alert"),
        }
    }

    /// Mark an alert as seen. The entry is retained. Returns whether the
    /// alert was found.
    pub fn acknowledge(&self, id: AlertId) -> bool {
        let mut alerts = self.alerts.lock().unwrap_or_else(|e| e.into_inner());
        match alerts.iter_mut().find(|alert| alert.id == id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Remove an alert from the local view. Dismissing an unknown id
    /// leaves state unchanged. Returns whether an entry was removed.
    pub fn dismiss(&self, id: AlertId) -> bool {
        let mut alerts = self.alerts.lock().unwrap_or_else(|e| e.into_inner());
        let before = alerts.len();
        alerts.retain(|alert| alert.id != id);
        alerts.len() < before
    }

    /// Number of alerts in the local view.
    pub fn active_count(&self) -> usize {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Snapshot of alerts, newest first.
    pub fn alerts(&self) -> Vec<WorkflowAlert> {
        self.alerts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
