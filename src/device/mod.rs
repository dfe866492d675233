// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observable state of one board.
//!
//! A [`DeviceState`] owns the device tree of one board through a
//! [`ChangeTracker`] and drives the board's services through a
//! [`DeviceLink`]. Every operation follows the same pattern: raise the
//! operation's flag, await the transport, commit the result into `data`, and
//! clear the flag. Listeners observe every individual mutation as a
//! [`DeviceChange`].
//!
//! # Examples
//!
//! ```
//! use microbit_sync::{Capability, DeviceConfig, DeviceState};
//! use microbit_sync::link::memory::MemoryLink;
//! use microbit_sync::subscription::Subscribable;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> microbit_sync::Result<()> {
//! let link = MemoryLink::builder("abc")
//!     .with_service(Capability::Temperature)
//!     .build();
//! link.set_temperature(21.5);
//!
//! let device = DeviceState::new(link, DeviceConfig::new());
//! device.on_change(|change| println!("{} = {}", change.path, change.value));
//!
//! device.connect().await?;
//! assert_eq!(device.read_temperature().await?, Some(21.5));
//!
//! // No LED service on this board: silently ignored
//! assert_eq!(device.read_matrix().await?, None);
//! # Ok(())
//! # }
//! ```

mod config;
mod guard;
mod notifications;
mod operations;

pub use config::DeviceConfig;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;

use crate::capabilities::{Capabilities, Capability};
use crate::error::{Error, Result};
use crate::event::{DeviceChange, DeviceId};
use crate::link::{DeviceLink, ServiceMap};
use crate::registry::{DeviceRegistry, RegistryShared};
use crate::state::{DeviceTree, paths};
use crate::subscription::{Listener, ListenerSet, Subscribable, SubscriptionId};
use crate::tracker::{Change, ChangeTracker, Path};

use guard::FlagGuard;

/// Detaches one push handler from the transport.
type Unbind = Box<dyn FnOnce() + Send>;

struct Inner<L: DeviceLink> {
    id: DeviceId,
    name: String,
    config: DeviceConfig,
    link: RwLock<Option<Arc<L>>>,
    services: RwLock<Option<ServiceMap<L>>>,
    tracker: ChangeTracker,
    listeners: ListenerSet<DeviceChange>,
    bindings: Mutex<Vec<Unbind>>,
    destroyed: AtomicBool,
    registry: Mutex<Option<Weak<RegistryShared<L>>>>,
}

impl<L: DeviceLink> Inner<L> {
    fn emit(&self, change: &Change) {
        tracing::trace!(device_id = %self.id, path = %change.path, value = %change.value, "State changed");
        let event = DeviceChange {
            device_id: self.id.clone(),
            snapshot: change.snapshot.clone(),
            path: change.path.clone(),
            value: change.value.clone(),
            previous: change.previous.clone(),
        };
        self.listeners.notify(&event);
    }
}

/// Observable state and operations of one board.
///
/// `DeviceState` is a cheap handle: cloning it yields another handle to the
/// same device. The tree is created at construction with every flag false and
/// every reading null; [`connect`](Self::connect) discovers which capabilities
/// the board has.
pub struct DeviceState<L: DeviceLink> {
    inner: Arc<Inner<L>>,
}

impl<L: DeviceLink> Clone for DeviceState<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: DeviceLink> std::fmt::Debug for DeviceState<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceState")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("connected", &self.is_connected())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

impl<L: DeviceLink> DeviceState<L> {
    /// Creates the state of the board reachable through `link`.
    ///
    /// The device is not registered anywhere; use
    /// [`DeviceRegistry::register`] to create and register in one step.
    #[must_use]
    pub fn new(link: L, config: DeviceConfig) -> Self {
        let id = link.id();
        let name = config
            .friendly_name
            .clone()
            .or_else(|| link.name())
            .unwrap_or_else(|| id.to_string());
        let tree = DeviceTree::new(id.as_str(), name.as_str()).to_value();

        let inner = Arc::new_cyclic(|weak: &Weak<Inner<L>>| {
            let weak = weak.clone();
            let tracker = ChangeTracker::new(tree, move |change| {
                if let Some(inner) = weak.upgrade() {
                    inner.emit(change);
                }
            });
            Inner {
                id,
                name,
                config,
                link: RwLock::new(Some(Arc::new(link))),
                services: RwLock::new(None),
                tracker,
                listeners: ListenerSet::new(),
                bindings: Mutex::new(Vec::new()),
                destroyed: AtomicBool::new(false),
                registry: Mutex::new(None),
            }
        });

        tracing::debug!(device_id = %inner.id, name = %inner.name, "Device state created");
        Self { inner }
    }

    // ========== Identity and reads ==========

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.inner.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the configuration the device was created with.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    /// Returns `true` once `connect()` has completed and until the link drops.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.flag(paths::CONNECTED)
    }

    /// Returns `true` after [`destroy`](Self::destroy).
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Returns a copy of the value at `path`.
    #[must_use]
    pub fn get(&self, path: impl Into<Path>) -> Option<Value> {
        self.inner.tracker.get(path)
    }

    /// Returns a structural copy of the whole tree.
    ///
    /// Later mutations do not affect the returned value.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.inner.tracker.target()
    }

    /// Returns the typed view of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the tree no longer has the expected shape.
    pub fn tree(&self) -> Result<DeviceTree> {
        Ok(DeviceTree::from_value(self.snapshot())?)
    }

    /// Returns the capabilities confirmed on connect.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.inner.tracker.with_target(Capabilities::from_snapshot)
    }

    // ========== Lifecycle ==========

    /// Connects to the board and discovers its capabilities.
    ///
    /// While this runs `connection.connecting` is true. Each capability the
    /// board exposes gets `available = true` and its push notifications bound.
    /// Configured sensor periods are then written. `connection.connected`
    /// becomes true only after `connecting` has been cleared.
    ///
    /// Connecting a connected device does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`] after `destroy()`, including when the
    /// device is destroyed while the connection is being set up, or the
    /// transport error. If setup fails after discovery, bindings and
    /// availability are rolled back and the link is closed before the error
    /// is returned.
    pub async fn connect(&self) -> Result<()> {
        let link = self.link()?;
        if self.is_connected() {
            return Ok(());
        }

        tracing::debug!(device_id = %self.inner.id, "Connecting");
        {
            let _connecting = self.raise(paths::CONNECTING);
            let services = link.connect().await?;
            if self.is_destroyed() {
                self.abandon(&link).await;
                return Err(Error::Destroyed);
            }

            let setup = self.setup(&link, services).await;
            if self.is_destroyed() {
                self.abandon(&link).await;
                return Err(Error::Destroyed);
            }
            if let Err(e) = setup {
                tracing::warn!(device_id = %self.inner.id, error = %e, "Connection setup failed, rolling back");
                self.abandon(&link).await;
                return Err(e);
            }
        }
        self.write(paths::CONNECTED, true)?;

        tracing::debug!(
            device_id = %self.inner.id,
            capabilities = self.capabilities().count(),
            "Connected"
        );
        Ok(())
    }

    /// Disconnects from the board.
    ///
    /// While this runs `connection.disconnecting` is true. If the link is up,
    /// disconnection is requested from the transport and the state follows
    /// from its disconnect notification; otherwise the state is reset
    /// directly. Readings are kept, stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`] after `destroy()`, or the transport error.
    pub async fn disconnect(&self) -> Result<()> {
        let link = self.link()?;

        tracing::debug!(device_id = %self.inner.id, "Disconnecting");
        let _disconnecting = self.raise(paths::DISCONNECTING);
        if link.is_linked() {
            link.disconnect().await?;
        }
        if !link.is_linked() {
            self.teardown();
        }
        Ok(())
    }

    /// Tears the device down for good.
    ///
    /// Disconnects on a best-effort basis, unbinds every handler, stops
    /// change notifications, removes the device from its registry and
    /// releases the link. Calling it again does nothing.
    pub async fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(device_id = %self.inner.id, "Destroying");

        let link = self.inner.link.read().clone();
        if let Some(link) = link
            && link.is_linked()
            && let Err(e) = link.disconnect().await
        {
            tracing::warn!(device_id = %self.inner.id, error = %e, "Disconnect during destroy failed");
        }

        self.teardown();
        self.inner.tracker.unsubscribe();
        self.inner.listeners.clear();

        let registry = self.inner.registry.lock().take();
        if let Some(shared) = registry.and_then(|weak| weak.upgrade()) {
            DeviceRegistry::from_shared(shared).detach(self);
        }

        *self.inner.services.write() = None;
        *self.inner.link.write() = None;
    }

    /// Binds the device to its connected services.
    async fn setup(&self, link: &Arc<L>, services: ServiceMap<L>) -> Result<()> {
        *self.inner.services.write() = Some(services.clone());
        self.bind_services(&services)?;
        self.bind_disconnect(link);
        self.apply_periods().await
    }

    /// Rolls back a connection attempt and closes the link, best effort.
    async fn abandon(&self, link: &Arc<L>) {
        self.teardown();
        if link.is_linked()
            && let Err(e) = link.disconnect().await
        {
            tracing::warn!(device_id = %self.inner.id, error = %e, "Failed to close link after rollback");
        }
    }

    /// Returns to the disconnected state: not connected, nothing available,
    /// no bindings, no services.
    fn teardown(&self) {
        let bindings: Vec<Unbind> = std::mem::take(&mut *self.inner.bindings.lock());
        for unbind in bindings {
            unbind();
        }
        *self.inner.services.write() = None;

        if let Err(e) = self.write(paths::CONNECTED, false) {
            tracing::warn!(device_id = %self.inner.id, error = %e, "Failed to clear connected flag");
        }
        for capability in Capability::ALL {
            if let Err(e) = self.inner.tracker.set(capability.available_path(), false) {
                tracing::warn!(device_id = %self.inner.id, %capability, error = %e, "Failed to clear availability");
            }
        }
    }

    async fn apply_periods(&self) -> Result<()> {
        let config = &self.inner.config;
        if let Some(period) = config.temperature_period {
            self.write_temperature_period(period).await?;
        }
        if let Some(period) = config.accelerometer_period {
            self.write_accelerometer_period(period).await?;
        }
        if let Some(period) = config.magnetometer_period {
            self.write_magnetometer_period(period).await?;
        }
        Ok(())
    }

    // ========== Registry wiring ==========

    pub(crate) fn set_registry(&self, registry: Option<Weak<RegistryShared<L>>>) {
        *self.inner.registry.lock() = registry;
    }

    pub(crate) fn same_device(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ========== Internals ==========

    fn ensure_alive(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::Destroyed);
        }
        Ok(())
    }

    fn link(&self) -> Result<Arc<L>> {
        self.ensure_alive()?;
        self.inner.link.read().clone().ok_or(Error::Destroyed)
    }

    /// Picks one service out of the connected services.
    ///
    /// `Ok(None)` when not connected or the board lacks the service.
    fn service<S>(&self, pick: impl FnOnce(&ServiceMap<L>) -> Option<S>) -> Result<Option<S>> {
        self.ensure_alive()?;
        Ok(self.inner.services.read().as_ref().and_then(pick))
    }

    fn raise(&self, path: &'static str) -> FlagGuard {
        FlagGuard::raise(&self.inner.tracker, path)
    }

    fn flag(&self, path: &str) -> bool {
        self.inner
            .tracker
            .with_target(|tree| Path::parse(path).lookup(tree).and_then(Value::as_bool))
            .unwrap_or(false)
    }

    fn write(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.inner.tracker.set(path, value)?;
        Ok(())
    }

    /// Commits `value` under `path` leaf by leaf.
    fn commit<T: Serialize + ?Sized>(&self, path: impl Into<Path>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.inner.tracker.merge(path, value)?;
        Ok(())
    }

    fn downgrade(&self) -> Weak<Inner<L>> {
        Arc::downgrade(&self.inner)
    }

    fn from_weak(weak: &Weak<Inner<L>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}

// ========== Listeners ==========

impl<L: DeviceLink> Subscribable for DeviceState<L> {
    type Event = DeviceChange;

    fn add_listener(&self, listener: Listener<DeviceChange>) -> SubscriptionId {
        self.inner.listeners.add(listener)
    }

    fn remove_listener(&self, listener: &Listener<DeviceChange>) -> bool {
        self.inner.listeners.remove(listener)
    }

    fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceChange) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.unsubscribe(id)
    }

    fn clear_listeners(&self) {
        self.inner.listeners.clear();
    }
}
