//! Project room stream.

use std::sync::{Arc, Mutex};

use sitelink_core::events::{
    ActivityEntry, PhaseOverride, ProgressUpdate, ProjectUpdate, TaskUpdate,
};
use sitelink_core::types::id::ProjectId;

use crate::bus::Subscription;
use crate::connection::manager::ConnectionManager;
use crate::event::{EventKind, ServerEvent};

use super::buffer::EventBuffer;

/// Any event scoped to a project room.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    /// General project update.
    Update(ProjectUpdate),
    /// Progress update.
    Progress(ProgressUpdate),
    /// Task update.
    Task(TaskUpdate),
    /// Activity feed entry.
    Activity(ActivityEntry),
    /// Workflow phase override.
    PhaseOverride(PhaseOverride),
}

/// Observes a bounded, newest-first history of one project's events.
///
/// Opening joins the project room and subscribes to its event kinds;
/// dropping the stream unsubscribes and leaves the room, so switching
/// projects (drop then open) cannot cross-talk.
#[derive(Debug)]
pub struct ProjectStream {
    manager: ConnectionManager,
    project_id: ProjectId,
    updates: Arc<Mutex<EventBuffer<ProjectEvent>>>,
    _subscriptions: Vec<Subscription>,
}

impl ProjectStream {
    /// Open a stream for one project.
    pub fn open(manager: &ConnectionManager, project_id: ProjectId) -> Self {
        let capacity = manager.config().room_buffer_capacity;
        let updates = Arc::new(Mutex::new(EventBuffer::new(capacity)));

        manager.join_project(project_id);

        let kinds = [
            EventKind::ProjectUpdate,
            EventKind::ProgressUpdate,
            EventKind::TaskUpdate,
            EventKind::Activity,
            EventKind::PhaseOverride,
        ];
        let subscriptions = kinds
            .into_iter()
            .map(|kind| {
                let updates = updates.clone();
                manager.on(kind, move |event| {
                    if let Some(scoped) = project_event_for(event, project_id) {
                        updates
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .push(scoped);
                    }
                })
            })
            .collect();

        Self {
            manager: manager.clone(),
            project_id,
            updates,
            _subscriptions: subscriptions,
        }
    }

    /// The project this stream observes.
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Snapshot of buffered events, newest first.
    pub fn recent(&self) -> Vec<ProjectEvent> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .to_vec()
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.updates.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no events are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for ProjectStream {
    fn drop(&mut self) {
        self.manager.leave_project(self.project_id);
    }
}

/// Extract the project-scoped payload when the event belongs to `project_id`.
fn project_event_for(event: &ServerEvent, project_id: ProjectId) -> Option<ProjectEvent> {
    match event {
        ServerEvent::ProjectUpdate(update) if update.project_id == project_id => {
            Some(ProjectEvent::Update(update.clone()))
        }
        ServerEvent::ProgressUpdate(update) if update.project_id == project_id => {
            Some(ProjectEvent::Progress(update.clone()))
        }
        ServerEvent::TaskUpdate(update) if update.project_id == project_id => {
            Some(ProjectEvent::Task(update.clone()))
        }
        ServerEvent::Activity(entry) if entry.project_id == project_id => {
            Some(ProjectEvent::Activity(entry.clone()))
        }
        ServerEvent::PhaseOverride(event) if event.project_id == project_id => {
            Some(ProjectEvent::PhaseOverride(event.clone()))
        }
        _ => None,
    }
}
