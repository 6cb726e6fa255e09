//! Presence tracker fed by inbound presence broadcasts.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use sitelink_core::types::id::UserId;

use super::status::PresenceStatus;

/// Tracks the latest known presence for every observed user.
///
/// Entries are created only by inbound presence events, never
/// speculatively. The whole map is cleared on disconnect; presence from a
/// dead connection must not be trusted.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    /// User ID → latest presence.
    entries: DashMap<UserId, PresenceEntry>,
}

/// The latest observation for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceEntry {
    /// Last reported status.
    pub status: PresenceStatus,
    /// When the status was last reported.
    pub last_seen: DateTime<Utc>,
}

impl PresenceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an inbound presence event.
    pub fn apply(&self, user_id: UserId, status: PresenceStatus, timestamp: DateTime<Utc>) {
        self.entries.insert(
            user_id,
            PresenceEntry {
                status,
                last_seen: timestamp,
            },
        );
    }

    /// A user's current status. Unknown users are offline, never an error.
    pub fn user_status(&self, user_id: UserId) -> PresenceStatus {
        self.entries
            .get(&user_id)
            .map(|entry| entry.status)
            .unwrap_or(PresenceStatus::Offline)
    }

    /// Whether the user currently has a live connection.
    pub fn is_user_online(&self, user_id: UserId) -> bool {
        self.user_status(user_id).is_connected()
    }

    /// When the user was last observed, if ever.
    pub fn last_seen(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        self.entries.get(&user_id).map(|entry| entry.last_seen)
    }

    /// Snapshot of every user with a non-offline status.
    pub fn online_users(&self) -> Vec<OnlineUser> {
        self.entries
            .iter()
            .filter(|entry| entry.status.is_connected())
            .map(|entry| OnlineUser {
                user_id: *entry.key(),
                status: entry.status,
                last_seen: entry.last_seen,
            })
            .collect()
    }

    /// Number of users with a non-offline status.
    pub fn online_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status.is_connected())
            .count()
    }

    /// Number of tracked users, offline observations included.
    pub fn tracked_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop every entry. Called on disconnect and link loss.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Snapshot entry for presence listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct OnlineUser {
    /// User ID.
    pub user_id: UserId,
    /// Presence status.
    pub status: PresenceStatus,
    /// Last observation time.
    pub last_seen: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_users_are_offline() {
        let tracker = PresenceTracker::new();
        let stranger = UserId::new();
        assert_eq!(tracker.user_status(stranger), PresenceStatus::Offline);
        assert!(!tracker.is_user_online(stranger));
    }

    #[test]
    fn latest_observation_wins() {
        let tracker = PresenceTracker::new();
        let user = UserId::new();
        tracker.apply(user, PresenceStatus::Online, Utc::now());
        tracker.apply(user, PresenceStatus::Busy, Utc::now());
        assert_eq!(tracker.user_status(user), PresenceStatus::Busy);
        assert!(tracker.is_user_online(user));
    }

    #[test]
    fn clear_forgets_everyone() {
        let tracker = PresenceTracker::new();
        for _ in 0..5 {
            tracker.apply(UserId::new(), PresenceStatus::Online, Utc::now());
        }
        assert_eq!(tracker.online_count(), 5);
        tracker.clear();
        assert_eq!(tracker.tracked_count(), 0);
    }

    #[test]
    fn explicit_offline_reports_are_kept_but_not_online() {
        let tracker = PresenceTracker::new();
        let user = UserId::new();
        tracker.apply(user, PresenceStatus::Offline, Utc::now());
        assert!(!tracker.is_user_online(user));
        assert_eq!(tracker.online_count(), 0);
        assert_eq!(tracker.tracked_count(), 1);
    }
}
