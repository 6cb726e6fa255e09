//! OS-level notification collaborator.

use std::fmt;

/// Host-reported permission state for OS-level notifications.
///
/// The engine only ever reads this; requesting permission is the host's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    /// The user granted notification permission.
    Granted,
    /// The user denied notification permission.
    Denied,
    /// Permission has not been requested yet.
    Default,
}

/// An OS-level notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopNotification {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Coalescing tag; the OS replaces an earlier notification carrying
    /// the same tag.
    pub tag: String,
}

/// Delivers OS-level notifications on behalf of the engine.
///
/// Implementations are expected to be cheap and non-blocking; delivery is
/// fire-and-forget and failures never propagate back into stream state.
pub trait DesktopNotifier: Send + Sync + fmt::Debug {
    /// Current permission state.
    fn permission(&self) -> NotificationPermission;

    /// Raise a notification. Only called when [`permission`] reported
    /// [`NotificationPermission::Granted`].
    ///
    /// [`permission`]: DesktopNotifier::permission
    fn notify(&self, notification: DesktopNotification);
}

/// A [`DesktopNotifier`] that reports denied permission and drops
/// everything. The default for hosts without a desktop surface.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl DesktopNotifier for NullNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn notify(&self, _notification: DesktopNotification) {}
}
