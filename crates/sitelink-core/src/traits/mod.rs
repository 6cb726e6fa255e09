//! Boundary collaborator traits.
//!
//! The real-time engine depends on the host application for authentication
//! state and OS-level notification delivery. Both are injected as trait
//! objects so tests can substitute deterministic doubles.

pub mod auth;
pub mod notifier;

pub use auth::{AuthProvider, StaticTokenProvider};
pub use notifier::{DesktopNotification, DesktopNotifier, NotificationPermission, NullNotifier};
