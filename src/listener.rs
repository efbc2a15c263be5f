use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

pub(crate) type Listener = Arc<dyn Fn() + Send + Sync + 'static>;

/// Token identifying one registration. Two subscriptions of the same
/// closure get two different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ListenerId(u64);

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener)>>,
}

impl ListenerRegistry {
    pub(crate) fn insert(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, listener));
        id
    }

    /// Returns `true` if the registration was still present.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.entries.lock().iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Copies the current listeners in registration order. The lock is
    /// released before the caller invokes anything.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Dropping it leaves the listener registered; call [`unsubscribe`](Self::unsubscribe)
/// to remove it.
pub struct Subscription {
    id: ListenerId,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, registry: &Arc<ListenerRegistry>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Removes this registration. Further calls, or calls after the store
    /// is gone, do nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.remove(self.id) {
                log::trace!("Unsubscribed listener {:?}", self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
