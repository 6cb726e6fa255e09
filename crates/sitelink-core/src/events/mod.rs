//! Domain event payloads pushed by the backend.
//!
//! These structs are the typed bodies of the wire events consumed by
//! the real-time engine: project room updates, conversation messages,
//! notifications, and workflow alerts.

pub mod conversation;
pub mod notification;
pub mod project;
pub mod workflow;

pub use conversation::{ChatMessage, OutgoingMessage, TypingSignal};
pub use notification::Notification;
pub use project::{ActivityEntry, PhaseOverride, ProgressUpdate, ProjectUpdate, TaskUpdate};
pub use workflow::{AlertPriority, WorkflowAlert, WorkflowAlertPatch};
