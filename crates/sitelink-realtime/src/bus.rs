//! Typed event bus with scoped subscription handles.
//!
//! Handlers are registered per [`EventKind`] and invoked in subscription
//! order. Subscribing returns a [`Subscription`] handle; dropping the handle
//! unsubscribes, so a remounted consumer can never leak handlers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::event::{EventKind, ServerEvent};

type Handler = Arc<dyn Fn(&ServerEvent) + Send + Sync>;

/// Dispatches [`ServerEvent`]s to registered handlers.
#[derive(Debug, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    /// Event kind → ordered handler list.
    handlers: RwLock<HashMap<EventKind, Vec<(u64, Handler)>>>,
    /// Monotonic handler ID source.
    next_id: AtomicU64,
}

impl std::fmt::Debug for BusInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusInner").finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    ///
    /// The handler stays registered until the returned [`Subscription`]
    /// is dropped. Handlers for the same kind run in subscription order.
    pub fn subscribe(
        &self,
        kind: EventKind,
        handler: impl Fn(&ServerEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let mut handlers = self
            .inner
            .handlers
            .write()
            .unwrap_or_else(|e| e.into_inner());
        handlers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));

        Subscription {
            bus: Arc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    /// Dispatch an event to every handler registered for its kind.
    ///
    /// Handlers are cloned out of the registry before invocation, so a
    /// handler may subscribe or unsubscribe without deadlocking.
    pub fn dispatch(&self, event: &ServerEvent) {
        let snapshot: Vec<Handler> = {
            let handlers = self
                .inner
                .handlers
                .read()
                .unwrap_or_else(|e| e.into_inner());
            handlers
                .get(&event.kind())
                .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };

        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of handlers registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .map(|list| list.len())
            .unwrap_or(0)
    }
}

/// A scoped handle to a registered handler.
///
/// Dropping the handle removes the handler. Removing a handler that is
/// already gone (bus dropped first) is a no-op.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<BusInner>,
    kind: EventKind,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            let mut handlers = bus.handlers.write().unwrap_or_else(|e| e.into_inner());
            if let Some(list) = handlers.get_mut(&self.kind) {
                list.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = seen.clone();
            bus.subscribe(EventKind::Connected, move |_| seen.lock().unwrap().push(1))
        };
        let second = {
            let seen = seen.clone();
            bus.subscribe(EventKind::Connected, move |_| seen.lock().unwrap().push(2))
        };

        bus.dispatch(&ServerEvent::Connected);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        drop((first, second));
    }

    #[test]
    fn dropping_a_subscription_unsubscribes() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0u32));

        let sub = {
            let seen = seen.clone();
            bus.subscribe(EventKind::Reconnected, move |_| {
                *seen.lock().unwrap() += 1;
            })
        };

        bus.dispatch(&ServerEvent::Reconnected);
        drop(sub);
        bus.dispatch(&ServerEvent::Reconnected);

        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(bus.handler_count(EventKind::Reconnected), 0);
    }

    #[test]
    fn dispatch_only_reaches_matching_kind() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0u32));

        let _sub = {
            let seen = seen.clone();
            bus.subscribe(EventKind::Disconnected, move |_| {
                *seen.lock().unwrap() += 1;
            })
        };

        bus.dispatch(&ServerEvent::Connected);
        assert_eq!(*seen.lock().unwrap(), 0);
    }
}
