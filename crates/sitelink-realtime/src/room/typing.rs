//! Typing indicator set with idle expiry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sitelink_core::types::id::UserId;

/// Tracks which users are currently typing in one conversation.
///
/// A start signal whose matching stop signal was dropped must not pin the
/// user in the set forever, so entries expire after an idle window.
/// Expiry is enforced at read time; no background timer runs.
#[derive(Debug)]
pub struct TypingTracker {
    expiry: Duration,
    entries: Mutex<HashMap<UserId, Instant>>,
}

impl TypingTracker {
    /// Create a tracker with the given idle expiry.
    pub fn new(expiry: Duration) -> Self {
        Self {
            expiry,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Apply a typing signal.
    pub fn set_typing(&self, user_id: UserId, is_typing: bool) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if is_typing {
            entries.insert(user_id, Instant::now());
        } else {
            entries.remove(&user_id);
        }
    }

    /// Whether the user is typing and within the expiry window.
    pub fn is_typing(&self, user_id: UserId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&user_id) {
            Some(since) if since.elapsed() < self.expiry => true,
            Some(_) => {
                entries.remove(&user_id);
                false
            }
            None => false,
        }
    }

    /// All users currently typing, expired entries pruned.
    pub fn typing_users(&self) -> Vec<UserId> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, since| since.elapsed() < self.expiry);
        entries.keys().copied().collect()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_signals_toggle_membership() {
        let tracker = TypingTracker::new(Duration::from_secs(8));
        let user = UserId::new();

        tracker.set_typing(user, true);
        assert!(tracker.is_typing(user));

        tracker.set_typing(user, false);
        assert!(!tracker.is_typing(user));
    }

    #[test]
    fn entries_expire_without_a_stop_signal() {
        let tracker = TypingTracker::new(Duration::from_millis(0));
        let user = UserId::new();

        tracker.set_typing(user, true);
        assert!(!tracker.is_typing(user));
        assert!(tracker.typing_users().is_empty());
    }
}
