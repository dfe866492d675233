// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directory of the devices known to the process.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::capabilities::Capabilities;
use crate::device::{DeviceConfig, DeviceState};
use crate::error::Result;
use crate::event::{DeviceChange, DeviceId, EventBus, RegistryEvent};
use crate::link::{DeviceLink, Scanner};
use crate::subscription::{Listener, ListenerSet, Subscribable, SubscriptionId};

struct Entry<L: DeviceLink> {
    device: DeviceState<L>,
    forward: SubscriptionId,
}

pub(crate) struct RegistryShared<L: DeviceLink> {
    devices: RwLock<HashMap<DeviceId, Entry<L>>>,
    listeners: ListenerSet<RegistryEvent>,
    event_bus: EventBus,
    scanning: AtomicBool,
}

impl<L: DeviceLink> RegistryShared<L> {
    fn emit(&self, event: RegistryEvent) {
        self.listeners.notify(&event);
        self.event_bus.publish(event);
    }

    /// Copies every registered device's tree.
    fn trees(&self) -> BTreeMap<DeviceId, Value> {
        let devices: Vec<DeviceState<L>> = self
            .devices
            .read()
            .values()
            .map(|entry| entry.device.clone())
            .collect();
        devices
            .into_iter()
            .map(|device| (device.id().clone(), device.snapshot()))
            .collect()
    }

    /// Builds the id to tree object carried by every event.
    ///
    /// `current` replaces the live tree of a registered device with the copy
    /// taken when its change was applied.
    fn snapshot_value(&self, current: Option<(&DeviceId, &Value)>) -> Value {
        let mut trees = self.trees();
        if let Some((id, tree)) = current
            && let Some(slot) = trees.get_mut(id)
        {
            slot.clone_from(tree);
        }
        Value::Object(
            trees
                .into_iter()
                .map(|(id, tree)| (id.to_string(), tree))
                .collect(),
        )
    }
}

/// Clears the scanning flag when dropped.
struct ScanGuard<'a>(&'a AtomicBool);

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Registry of devices keyed by identifier.
///
/// The registry re-broadcasts every change of every registered device as a
/// [`RegistryEvent`] with [`Scope::Device`](crate::event::Scope::Device), and
/// announces additions and removals with
/// [`Scope::Devices`](crate::event::Scope::Devices). Every event carries the
/// trees of all registered devices, keyed by id. Events reach callback
/// listeners (see [`Subscribable`]) and broadcast receivers (see
/// [`subscribe`](Self::subscribe)).
///
/// `DeviceRegistry` is a cheap handle: clones share the same devices.
///
/// # Examples
///
/// ```
/// use microbit_sync::{Capability, DeviceConfig, DeviceRegistry};
/// use microbit_sync::link::memory::MemoryLink;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> microbit_sync::Result<()> {
/// let registry = DeviceRegistry::new();
/// let mut events = registry.subscribe();
///
/// let link = MemoryLink::builder("abc").with_service(Capability::Led).build();
/// let device = registry.register(link, DeviceConfig::new());
/// device.connect().await?;
///
/// assert!(registry.capabilities(device.id()).unwrap().led);
/// assert!(events.recv().await.unwrap().is_added());
///
/// registry.shutdown().await;
/// assert!(registry.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct DeviceRegistry<L: DeviceLink> {
    shared: Arc<RegistryShared<L>>,
}

impl<L: DeviceLink> Clone for DeviceRegistry<L> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<L: DeviceLink> Default for DeviceRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DeviceLink> std::fmt::Debug for DeviceRegistry<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.ids())
            .field("scanning", &self.is_scanning())
            .finish_non_exhaustive()
    }
}

impl<L: DeviceLink> DeviceRegistry<L> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_event_bus(EventBus::new())
    }

    /// Creates an empty registry with a custom event bus capacity.
    #[must_use]
    pub fn with_capacity(event_capacity: usize) -> Self {
        Self::with_event_bus(EventBus::with_capacity(event_capacity))
    }

    fn with_event_bus(event_bus: EventBus) -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                devices: RwLock::new(HashMap::new()),
                listeners: ListenerSet::new(),
                event_bus,
                scanning: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn from_shared(shared: Arc<RegistryShared<L>>) -> Self {
        Self { shared }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to registry events.
    ///
    /// Returns a receiver that gets every event emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.shared.event_bus.subscribe()
    }

    /// Returns the number of active broadcast receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.event_bus.subscriber_count()
    }

    // =========================================================================
    // Device Management
    // =========================================================================

    /// Creates the device reachable through `link` and registers it.
    pub fn register(&self, link: L, config: DeviceConfig) -> DeviceState<L> {
        let device = DeviceState::new(link, config);
        self.add(device.clone());
        device
    }

    /// Registers `device`.
    ///
    /// A different device already registered under the same identifier is
    /// replaced and detached. Adding a device that is already registered does
    /// nothing.
    pub fn add(&self, device: DeviceState<L>) {
        let id = device.id().clone();
        if self
            .shared
            .devices
            .read()
            .get(&id)
            .is_some_and(|entry| entry.device.same_device(&device))
        {
            return;
        }

        let weak = Arc::downgrade(&self.shared);
        let forward: Listener<DeviceChange> = Arc::new(move |change: &DeviceChange| {
            if let Some(shared) = weak.upgrade() {
                let snapshot = shared.snapshot_value(Some((&change.device_id, &change.snapshot)));
                shared.emit(RegistryEvent::device_changed(change.clone(), snapshot));
            }
        });
        let forward = device.add_listener(forward);
        device.set_registry(Some(Arc::downgrade(&self.shared)));

        let tree = device.snapshot();
        let replaced = self
            .shared
            .devices
            .write()
            .insert(id.clone(), Entry { device, forward });

        let snapshot = self.shared.snapshot_value(None);
        let mut event = RegistryEvent::device_added(id.clone(), tree, snapshot);
        if let Some(old) = replaced {
            tracing::debug!(device_id = %id, "Replacing registered device");
            old.device.unsubscribe(old.forward);
            old.device.set_registry(None);
            event.previous = old.device.snapshot();
        }

        tracing::debug!(device_id = %id, "Device registered");
        self.shared.emit(event);
    }

    /// Removes the device registered under `id`.
    ///
    /// The device stops forwarding its changes to this registry but is not
    /// destroyed. Returns `None` if no device was registered under `id`.
    pub fn remove(&self, id: &DeviceId) -> Option<DeviceState<L>> {
        let entry = self.shared.devices.write().remove(id)?;
        Some(self.finish_removal(entry))
    }

    /// Removes `device` if it is the one registered under its identifier.
    pub(crate) fn detach(&self, device: &DeviceState<L>) {
        let entry = {
            let mut devices = self.shared.devices.write();
            match devices.get(device.id()) {
                Some(entry) if entry.device.same_device(device) => devices.remove(device.id()),
                _ => None,
            }
        };
        if let Some(entry) = entry {
            self.finish_removal(entry);
        }
    }

    fn finish_removal(&self, entry: Entry<L>) -> DeviceState<L> {
        let Entry { device, forward } = entry;
        device.unsubscribe(forward);
        device.set_registry(None);

        tracing::debug!(device_id = %device.id(), "Device unregistered");
        self.shared.emit(RegistryEvent::device_removed(
            device.id().clone(),
            device.snapshot(),
            self.shared.snapshot_value(None),
        ));
        device
    }

    /// Returns the device registered under `id`.
    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<DeviceState<L>> {
        self.shared
            .devices
            .read()
            .get(id)
            .map(|entry| entry.device.clone())
    }

    /// Returns the identifiers of every registered device, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self.shared.devices.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns every registered device, sorted by identifier.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceState<L>> {
        let mut devices: Vec<DeviceState<L>> = self
            .shared
            .devices
            .read()
            .values()
            .map(|entry| entry.device.clone())
            .collect();
        devices.sort_by(|a, b| a.id().cmp(b.id()));
        devices
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.devices.read().len()
    }

    /// Returns `true` if no device is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.devices.read().is_empty()
    }

    /// Returns the capabilities of a registered device.
    #[must_use]
    pub fn capabilities(&self, id: &DeviceId) -> Option<Capabilities> {
        self.get(id).map(|device| device.capabilities())
    }

    /// Returns a snapshot of every registered device's tree.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<DeviceId, Value> {
        self.shared.trees()
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Requests a board from `scanner` and registers it.
    ///
    /// [`is_scanning`](Self::is_scanning) is true while the request is
    /// pending, whatever its outcome.
    ///
    /// # Errors
    ///
    /// Returns the scanner's error if no board was obtained.
    pub async fn scan<S>(&self, scanner: &S, config: DeviceConfig) -> Result<DeviceState<L>>
    where
        S: Scanner<Link = L>,
    {
        self.shared.scanning.store(true, Ordering::SeqCst);
        let _scanning = ScanGuard(&self.shared.scanning);

        tracing::debug!("Scanning for a device");
        let link = scanner.request_device().await?;
        Ok(self.register(link, config))
    }

    /// Returns `true` while a [`scan`](Self::scan) is pending.
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.shared.scanning.load(Ordering::SeqCst)
    }

    /// Destroys every registered device.
    pub async fn shutdown(&self) {
        for device in self.devices() {
            device.destroy().await;
        }
    }
}

impl<L: DeviceLink> Subscribable for DeviceRegistry<L> {
    type Event = RegistryEvent;

    fn add_listener(&self, listener: Listener<RegistryEvent>) -> SubscriptionId {
        self.shared.listeners.add(listener)
    }

    fn remove_listener(&self, listener: &Listener<RegistryEvent>) -> bool {
        self.shared.listeners.remove(listener)
    }

    fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.listeners.unsubscribe(id)
    }

    fn clear_listeners(&self) {
        self.shared.listeners.clear();
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::capabilities::Capability;
    use crate::event::Scope;
    use crate::link::memory::{MemoryLink, MemoryScanner};
    use parking_lot::Mutex;
    use serde_json::json;

    fn link(id: &str) -> MemoryLink {
        MemoryLink::builder(id).with_service(Capability::Temperature).build()
    }

    fn record(registry: &DeviceRegistry<MemoryLink>) -> Arc<Mutex<Vec<RegistryEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        registry.on_change(move |event| sink.lock().push(event.clone()));
        log
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = DeviceRegistry::<MemoryLink>::new();
        assert!(registry.is_empty());
        assert_eq!(registry.subscriber_count(), 0);
        assert!(!registry.is_scanning());
    }

    #[test]
    fn register_announces_device() {
        let registry = DeviceRegistry::new();
        let log = record(&registry);

        let device = registry.register(link("abc"), DeviceConfig::new());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.ids(), vec![DeviceId::new("abc")]);
        let events = log.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scope, Scope::Devices);
        assert_eq!(events[0].path.to_string(), "abc");
        assert_eq!(events[0].value, device.snapshot());
        assert!(events[0].previous.is_null());
    }

    #[test]
    fn adding_the_same_device_twice_is_a_no_op() {
        let registry = DeviceRegistry::new();
        let device = registry.register(link("abc"), DeviceConfig::new());
        let log = record(&registry);

        registry.add(device.clone());

        assert!(log.lock().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn device_changes_are_forwarded_with_device_scope() {
        let registry = DeviceRegistry::new();
        let device = registry.register(link("abc"), DeviceConfig::new());
        let log = record(&registry);

        device.connect().await.unwrap();

        let events = log.lock();
        assert!(events.iter().all(|e| e.scope == Scope::Device));
        assert!(events.iter().all(|e| e.device_id == DeviceId::new("abc")));
        let last = events.last().unwrap();
        assert_eq!(last.path.to_string(), "connection.connected");
        assert_eq!(last.snapshot["abc"]["temperature"]["available"], json!(true));
        assert_eq!(last.device_snapshot(), Some(&device.snapshot()));
    }

    #[tokio::test]
    async fn removed_device_no_longer_forwards() {
        let registry = DeviceRegistry::new();
        let device = registry.register(link("abc"), DeviceConfig::new());
        let log = record(&registry);

        let removed = registry.remove(device.id()).unwrap();
        device.connect().await.unwrap();

        assert!(removed.is_connected());
        let events = log.lock();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_removed());
        assert_eq!(events[0].previous["id"], json!("abc"));
        assert_eq!(events[0].snapshot, json!({}));
        assert!(registry.remove(device.id()).is_none());
    }

    #[tokio::test]
    async fn every_event_carries_all_registered_devices() {
        let registry = DeviceRegistry::new();
        let log = record(&registry);
        registry.register(link("abc"), DeviceConfig::new());
        let def = registry.register(link("def"), DeviceConfig::new());

        def.connect().await.unwrap();

        let events = log.lock();
        assert!(events.len() > 2);
        for event in &events[1..] {
            let ids: Vec<&String> = event.snapshot.as_object().unwrap().keys().collect();
            assert_eq!(ids, vec!["abc", "def"], "{} {}", event.device_id, event.path);
        }
        assert_eq!(events[0].snapshot.as_object().unwrap().len(), 1);
        let last = events.last().unwrap();
        assert_eq!(last.scope, Scope::Device);
        assert_eq!(last.snapshot["def"]["connection"]["connected"], json!(true));
        assert_eq!(last.snapshot["abc"]["connection"]["connected"], json!(false));
    }

    #[test]
    fn replacing_a_device_detaches_the_old_one() {
        let registry = DeviceRegistry::new();
        let first = registry.register(link("abc"), DeviceConfig::new());
        let second = registry.register(link("abc"), DeviceConfig::new().with_friendly_name("B"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(first.id()).unwrap().name(), "B");
        assert!(registry.get(second.id()).unwrap().same_device(&second));
    }

    #[tokio::test]
    async fn snapshot_reflects_availability() {
        let registry = DeviceRegistry::new();
        let device = registry.register(link("abc"), DeviceConfig::new());
        registry.register(link("def"), DeviceConfig::new());
        device.connect().await.unwrap();

        let snapshot = registry.snapshot();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&DeviceId::new("abc")]["temperature"]["available"], json!(true));
        assert_eq!(snapshot[&DeviceId::new("def")]["temperature"]["available"], json!(false));
        assert!(registry.capabilities(&DeviceId::new("abc")).unwrap().temperature);
    }

    #[tokio::test]
    async fn broadcast_receivers_get_events() {
        let registry = DeviceRegistry::new();
        let mut rx = registry.subscribe();

        registry.register(link("abc"), DeviceConfig::new());

        let event = rx.recv().await.unwrap();
        assert!(event.is_added());
        assert_eq!(event.device_id, DeviceId::new("abc"));
    }

    #[tokio::test]
    async fn destroy_unregisters_once() {
        let registry = DeviceRegistry::new();
        let device = registry.register(link("abc"), DeviceConfig::new());
        let log = record(&registry);

        device.destroy().await;
        device.destroy().await;

        assert!(registry.is_empty());
        let removals = log.lock().iter().filter(|e| e.is_removed()).count();
        assert_eq!(removals, 1);
    }

    #[tokio::test]
    async fn destroying_a_replaced_device_keeps_the_new_one() {
        let registry = DeviceRegistry::new();
        let first = registry.register(link("abc"), DeviceConfig::new());
        let second = registry.register(link("abc"), DeviceConfig::new());

        first.destroy().await;

        assert!(registry.get(second.id()).unwrap().same_device(&second));
    }

    #[tokio::test]
    async fn scan_registers_the_requested_device() {
        let registry = DeviceRegistry::new();
        let scanner = MemoryScanner::new([link("abc")]);

        let device = registry.scan(&scanner, DeviceConfig::new()).await.unwrap();

        assert_eq!(device.id(), &DeviceId::new("abc"));
        assert!(registry.get(device.id()).is_some());
        assert!(!registry.is_scanning());
        assert!(registry.scan(&scanner, DeviceConfig::new()).await.is_err());
        assert!(!registry.is_scanning());
    }

    #[tokio::test]
    async fn shutdown_destroys_every_device() {
        let registry = DeviceRegistry::new();
        let a = registry.register(link("a"), DeviceConfig::new());
        let b = registry.register(link("b"), DeviceConfig::new());
        a.connect().await.unwrap();

        registry.shutdown().await;

        assert!(registry.is_empty());
        assert!(a.is_destroyed() && b.is_destroyed());
    }
}
