//! Room membership bookkeeping.

use dashmap::DashSet;

use sitelink_core::types::id::{ConversationId, ProjectId};

/// A server-defined scope the client joins to receive scoped events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomId {
    /// A project room.
    Project(ProjectId),
    /// A conversation room.
    Conversation(ConversationId),
}

impl RoomId {
    /// Wire channel name for this room.
    pub fn channel_name(&self) -> String {
        match self {
            Self::Project(id) => format!("project:{id}"),
            Self::Conversation(id) => format!("conversation:{id}"),
        }
    }
}

/// Set of rooms the client currently holds membership in.
///
/// Membership mutation is synchronous and separate from frame delivery:
/// the set is the source of truth for re-joins after a reconnect, even
/// when the join frame itself was dropped while offline.
#[derive(Debug, Default)]
pub struct RoomMembership {
    rooms: DashSet<RoomId>,
}

impl RoomMembership {
    /// Create an empty membership set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join. Returns `true` when the room was newly joined.
    pub fn join(&self, room: RoomId) -> bool {
        self.rooms.insert(room)
    }

    /// Record a leave. Returns `true` when the room was actually held.
    pub fn leave(&self, room: RoomId) -> bool {
        self.rooms.remove(&room).is_some()
    }

    /// Whether the room is currently held.
    pub fn contains(&self, room: RoomId) -> bool {
        self.rooms.contains(&room)
    }

    /// Snapshot of all held rooms.
    pub fn snapshot(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of held rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms are held.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Drop every membership.
    pub fn clear(&self) {
        self.rooms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_idempotent() {
        let rooms = RoomMembership::new();
        let room = RoomId::Project(ProjectId::new());

        assert!(rooms.join(room));
        assert!(!rooms.join(room));
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn leaving_an_unjoined_room_is_a_noop() {
        let rooms = RoomMembership::new();
        assert!(!rooms.leave(RoomId::Conversation(ConversationId::new())));
        assert!(rooms.is_empty());
    }

    #[test]
    fn channel_names_carry_the_room_kind() {
        let project = ProjectId::new();
        assert_eq!(
            RoomId::Project(project).channel_name(),
            format!("project:{project}")
        );
    }
}
