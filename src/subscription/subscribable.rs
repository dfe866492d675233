// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for observable sources.

use crate::subscription::{Listener, SubscriptionId};

/// Trait for types that fan out events to listeners.
///
/// Implemented by [`DeviceState`](crate::DeviceState), whose events are
/// [`DeviceChange`](crate::event::DeviceChange)s, and by
/// [`DeviceRegistry`](crate::DeviceRegistry), whose events are
/// [`RegistryEvent`](crate::event::RegistryEvent)s.
pub trait Subscribable {
    /// Event type delivered to listeners.
    type Event;

    /// Registers a shared listener handle.
    ///
    /// Registering a handle that is already present returns the existing ID
    /// and keeps a single entry.
    fn add_listener(&self, listener: Listener<Self::Event>) -> SubscriptionId;

    /// Removes a previously registered handle.
    ///
    /// Returns `false` if it was not registered.
    fn remove_listener(&self, listener: &Listener<Self::Event>) -> bool;

    /// Registers a closure as a new listener.
    fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Self::Event) + Send + Sync + 'static;

    /// Removes the listener registered under `id`.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Removes every listener.
    fn clear_listeners(&self);
}
