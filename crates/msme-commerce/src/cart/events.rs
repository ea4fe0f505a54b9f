//! "Cart changed" notifications.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback invoked after the cart changes. Carries no payload; listeners
/// re-read the store.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`CartEvents::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Publish/subscribe registry for cart change signals.
///
/// Clones share one registry, so every store handed the same `CartEvents`
/// broadcasts to the same listeners.
#[derive(Clone, Default)]
pub struct CartEvents {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for CartEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl CartEvents {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.lock();
        let len_before = registry.listeners.len();
        registry.listeners.retain(|(sid, _)| *sid != id);
        registry.listeners.len() < len_before
    }

    /// Notify every current listener, in subscription order.
    ///
    /// The registry is not locked while listeners run, so a listener may read
    /// the store or (un)subscribe. Listeners added during a publish are first
    /// called on the next one.
    pub fn publish(&self) {
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener();
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
