// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener storage and fan-out.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`Listener`] - Shared callback handle, compared by identity
//! - [`ListenerSet`] - Ordered, de-duplicated set of listeners

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Unique identifier for a subscription.
///
/// IDs are unique within the set that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// A shared listener callback.
///
/// Two listeners are the same listener when they share the same allocation,
/// so registering a clone of an already registered handle is a no-op.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Outcome of a fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners that returned normally.
    pub delivered: usize,
    /// Listeners that panicked.
    pub failed: usize,
}

impl Delivery {
    /// Total number of listeners that were invoked.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Ordered set of listeners for events of type `E`.
///
/// Listeners are invoked in registration order. A panicking listener is
/// isolated: it is logged and counted, and the remaining listeners still run.
/// Listeners added or removed while a fan-out is in flight take effect on the
/// next one.
pub struct ListenerSet<E> {
    next_id: AtomicU64,
    entries: RwLock<Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> ListenerSet<E> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Registers `listener`, returning its subscription ID.
    ///
    /// Adding a listener that is already present keeps a single entry and
    /// returns the existing ID.
    pub fn add(&self, listener: Listener<E>) -> SubscriptionId {
        let mut entries = self.entries.write();
        if let Some((id, _)) = entries.iter().find(|(_, l)| Arc::ptr_eq(l, &listener)) {
            return *id;
        }
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        entries.push((id, listener));
        id
    }

    /// Registers a closure as a new listener.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.add(Arc::new(callback))
    }

    /// Removes `listener`. Returns `false` if it was not registered.
    pub fn remove(&self, listener: &Listener<E>) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(_, l)| !Arc::ptr_eq(l, listener));
        entries.len() != before
    }

    /// Removes the listener registered under `id`.
    ///
    /// Returns `true` if a listener was removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Invokes every listener with `event`.
    ///
    /// The listener list is copied before dispatch, so listeners may add or
    /// remove listeners (including themselves) without deadlocking.
    pub fn notify(&self, event: &E) -> Delivery {
        let snapshot: Vec<_> = self.entries.read().clone();
        let mut delivery = Delivery::default();

        for (id, listener) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => delivery.delivered += 1,
                Err(_) => {
                    tracing::warn!(subscription = %id, "Listener panicked during notification");
                    delivery.failed += 1;
                }
            }
        }

        delivery
    }
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn subscription_id_display() {
        let set = ListenerSet::<u32>::new();
        let id = set.subscribe(|_| {});
        assert_eq!(id.to_string(), "Sub(1)");
        assert_eq!(id.value(), 1);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let set = ListenerSet::<u32>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            set.subscribe(move |_| order.lock().push(tag));
        }

        let delivery = set.notify(&7);
        assert_eq!(delivery.delivered, 3);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn adding_the_same_listener_twice_keeps_one_entry() {
        let set = ListenerSet::<u32>::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        let listener: Listener<u32> = Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = set.add(Arc::clone(&listener));
        let second = set.add(Arc::clone(&listener));

        assert_eq!(first, second);
        assert_eq!(set.len(), 1);
        set.notify(&1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_by_handle_and_by_id() {
        let set = ListenerSet::<u32>::new();
        let listener: Listener<u32> = Arc::new(|_| {});
        set.add(Arc::clone(&listener));
        let id = set.subscribe(|_| {});

        assert!(set.remove(&listener));
        assert!(!set.remove(&listener));
        assert!(set.unsubscribe(id));
        assert!(!set.unsubscribe(id));
        assert!(set.is_empty());
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let set = ListenerSet::<u32>::new();
        let reached = Arc::new(AtomicU64::new(0));

        set.subscribe(|_| panic!("listener failure"));
        let counter = Arc::clone(&reached);
        set.subscribe(move |value| {
            counter.store(u64::from(*value), Ordering::SeqCst);
        });

        let delivery = set.notify(&42);

        assert_eq!(delivery, Delivery { delivered: 1, failed: 1 });
        assert_eq!(delivery.attempted(), 2);
        assert_eq!(reached.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn listener_may_unsubscribe_itself() {
        let set = Arc::new(ListenerSet::<u32>::new());
        let slot = Arc::new(Mutex::new(None));

        let inner_set = Arc::clone(&set);
        let inner_slot = Arc::clone(&slot);
        let id = set.subscribe(move |_| {
            if let Some(id) = *inner_slot.lock() {
                inner_set.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        assert_eq!(set.notify(&1).delivered, 1);
        assert!(set.is_empty());
        assert_eq!(set.notify(&2).attempted(), 0);
    }
}
