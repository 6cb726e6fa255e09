//! Project-scoped update events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ProjectId, TaskId, UserId};

/// A general project update (scope change, document upload, schedule edit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    /// The project the update belongs to.
    pub project_id: ProjectId,
    /// Short human-readable summary.
    pub summary: String,
    /// Free-form details attached by the backend.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    /// The user who caused the update (if applicable).
    #[serde(default)]
    pub actor_id: Option<UserId>,
    /// When the update occurred.
    pub timestamp: DateTime<Utc>,
}

/// Overall completion progress for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// The project the update belongs to.
    pub project_id: ProjectId,
    /// Percent complete (0-100).
    pub percent_complete: u8,
    /// The current workflow phase name.
    pub phase: String,
    /// When the update occurred.
    pub timestamp: DateTime<Utc>,
}

/// A task status change within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// The project the task belongs to.
    pub project_id: ProjectId,
    /// The task that changed.
    pub task_id: TaskId,
    /// Task title (for display).
    pub title: String,
    /// New task status.
    pub status: String,
    /// User the task is assigned to (if any).
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    /// When the update occurred.
    pub timestamp: DateTime<Utc>,
}

/// An activity feed entry for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// The project the activity belongs to.
    pub project_id: ProjectId,
    /// The user who performed the activity (if applicable).
    #[serde(default)]
    pub actor_id: Option<UserId>,
    /// Human-readable description of what happened.
    pub description: String,
    /// When the activity occurred.
    pub timestamp: DateTime<Utc>,
}

/// A manual override of a project's workflow phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOverride {
    /// The project whose phase was overridden.
    pub project_id: ProjectId,
    /// The phase the project was moved to.
    pub phase: String,
    /// The user who performed the override.
    pub overridden_by: UserId,
    /// Optional reason supplied with the override.
    #[serde(default)]
    pub reason: Option<String>,
    /// When the override occurred.
    pub timestamp: DateTime<Utc>,
}
