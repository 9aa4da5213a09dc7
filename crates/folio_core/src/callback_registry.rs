//! Callback registry for synchronizer event subscriptions.
//!
//! Subscribers receive [`SyncEvent`] notifications whenever the cached
//! documents, blocks, selection or saving flag change.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::events::SyncEvent;

/// A unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback function type for synchronizer events.
///
/// Callbacks run synchronously inside the mutating operation and should not block.
pub type EventCallback = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

/// Thread-safe registry for managing event subscriptions.
///
/// # Example
///
/// ```ignore
/// use folio_core::callback_registry::CallbackRegistry;
/// use folio_core::events::SyncEvent;
/// use std::sync::Arc;
///
/// let registry = CallbackRegistry::new();
/// let id = registry.subscribe(Arc::new(|event| println!("{:?}", event)));
/// registry.emit(&SyncEvent::DocumentsChanged);
/// registry.unsubscribe(id);
/// ```
pub struct CallbackRegistry {
    callbacks: RwLock<HashMap<SubscriptionId, EventCallback>>,
    next_id: AtomicU64,
}

impl CallbackRegistry {
    /// Create a new empty callback registry.
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to events. Returns an id for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, callback: EventCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, callback);
        id
    }

    /// Unsubscribe. Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    /// Emit an event to all registered callbacks.
    ///
    /// Callbacks are invoked in an undefined order. A panicking callback does
    /// not prevent the others from running.
    pub fn emit(&self, event: &SyncEvent) {
        // Snapshot so callbacks may subscribe/unsubscribe without deadlocking.
        let callbacks: Vec<EventCallback> = self
            .callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(event);
            }));
            if result.is_err() {
                log::warn!("Event callback panicked while handling {:?}", event);
            }
        }
    }

    /// Get the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Clear all subscriptions.
    pub fn clear(&self) {
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("subscriber_count", &self.subscriber_count())
            .field("next_id", &self.next_id.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(counter: &Arc<AtomicUsize>) -> EventCallback {
        let counter = Arc::clone(counter);
        Arc::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_subscribe_and_emit() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry.subscribe(counting(&counter));
        registry.subscribe(counting(&counter));

        registry.emit(&SyncEvent::DocumentsChanged);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let id = registry.subscribe(counting(&counter));

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.emit(&SyncEvent::DocumentsChanged);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unique_ids_and_clear() {
        let registry = CallbackRegistry::new();
        let a = registry.subscribe(Arc::new(|_| {}));
        let b = registry.subscribe(Arc::new(|_| {}));
        assert_ne!(a, b);
        assert_eq!(registry.subscriber_count(), 2);
        registry.clear();
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_callback_panic_isolation() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry.subscribe(Arc::new(|_| panic!("boom")));
        registry.subscribe(counting(&counter));

        registry.emit(&SyncEvent::blocks_changed("doc"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
