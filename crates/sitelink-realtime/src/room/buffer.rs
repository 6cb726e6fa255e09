//! Bounded newest-first event buffer.

use std::collections::VecDeque;

/// A fixed-capacity buffer holding the most recent events, newest first.
///
/// Overflow silently drops the oldest entry.
#[derive(Debug, Clone)]
pub struct EventBuffer<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> EventBuffer<T> {
    /// Create a buffer with the given capacity, clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Prepend an event, evicting the oldest beyond capacity.
    pub fn push(&mut self, event: T) {
        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all buffered events.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> EventBuffer<T> {
    /// Snapshot as a vector, newest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}
