//! Change-notification registry.
//!
//! An explicit subject/observer abstraction: listeners register a
//! zero-argument callback and are invoked synchronously, in
//! registration order, after every successful mutation. A panicking
//! listener is isolated so the remaining listeners still run and the
//! mutating caller never sees the panic.

use std::sync::Arc;

/// A registered change callback.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of change listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Returns the handle used to unregister it.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Unregister a callback. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Snapshot the registered callbacks in registration order.
    ///
    /// Invocation happens on the snapshot so a listener that mutates
    /// the registry (subscribing or unsubscribing) does not deadlock
    /// the notifying call.
    pub fn snapshot(&self) -> Vec<Listener> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True when no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Invoke each listener, isolating panics per listener.
///
/// Runs synchronously in registration order; a panicking listener is
/// caught and logged, and the remaining listeners still run.
pub fn notify_all(listeners: &[Listener]) {
    for listener in listeners {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| listener()));
        if result.is_err() {
            tracing::warn!("change listener panicked; continuing with remaining listeners");
        }
    }
}
