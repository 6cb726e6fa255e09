//! Workflow alert payloads and priority levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{AlertId, ProjectId};

/// Workflow alert priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    /// Background events.
    Low,
    /// Standard events.
    Medium,
    /// Important events.
    High,
    /// Requires immediate attention.
    Urgent,
}

impl AlertPriority {
    /// Parse from string with a default fallback.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Whether alerts at this priority warrant an OS-level notification.
    pub fn warrants_desktop_alert(&self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

/// A workflow alert tied to a project's workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAlert {
    /// Alert ID.
    pub id: AlertId,
    /// The project whose workflow raised the alert.
    pub project_id: ProjectId,
    /// The workflow step requiring attention.
    pub step_title: String,
    /// Alert priority.
    pub priority: AlertPriority,
    /// Whether the local user has acknowledged the alert.
    #[serde(default)]
    pub acknowledged: bool,
    /// When the alert was raised.
    pub created_at: DateTime<Utc>,
}

/// A partial patch applied to an existing workflow alert.
///
/// Patches for unknown alert IDs are dropped by the consumer; an update
/// arriving after a dismiss is a benign race, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAlertPatch {
    /// The alert being updated.
    pub id: AlertId,
    /// New step title, if it changed.
    #[serde(default)]
    pub step_title: Option<String>,
    /// New priority, if it changed.
    #[serde(default)]
    pub priority: Option<AlertPriority>,
    /// Server-side acknowledged flag, if it changed.
    #[serde(default)]
    pub acknowledged: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parsing_falls_back_to_medium() {
        assert_eq!(AlertPriority::from_str_or_default("urgent"), AlertPriority::Urgent);
        assert_eq!(AlertPriority::from_str_or_default("???"), AlertPriority::Medium);
    }

    #[test]
    fn only_high_and_urgent_reach_the_desktop() {
        assert!(!AlertPriority::Low.warrants_desktop_alert());
        assert!(!AlertPriority::Medium.warrants_desktop_alert());
        assert!(AlertPriority::High.warrants_desktop_alert());
        assert!(AlertPriority::Urgent.warrants_desktop_alert());
    }
}
