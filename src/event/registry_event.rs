// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry-level event types.

use serde::Serialize;
use serde_json::Value;

use crate::tracker::Path;

use super::{DeviceChange, DeviceId};

/// Origin of a [`RegistryEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The set of registered devices changed.
    Devices,
    /// A field inside one device's tree changed.
    Device,
}

/// Events emitted by the device registry.
///
/// `snapshot` is always the whole registry: an object mapping every
/// registered device id to that device's tree, taken right after the change.
/// For [`Scope::Devices`] events, `path` is the device id, `value` the
/// device's tree (null on removal) and `previous` its last tree (null on
/// addition). For [`Scope::Device`] events `device_id`, `path`, `value` and
/// `previous` mirror the originating [`DeviceChange`].
///
/// # Examples
///
/// ```
/// use microbit_sync::event::{DeviceId, RegistryEvent, Scope};
/// use serde_json::json;
///
/// let tree = json!({ "id": "abc" });
/// let added = RegistryEvent::device_added(
///     DeviceId::new("abc"),
///     tree.clone(),
///     json!({ "abc": tree }),
/// );
/// assert_eq!(added.scope, Scope::Devices);
/// assert_eq!(added.path.to_string(), "abc");
/// assert_eq!(added.device_snapshot(), Some(&json!({ "id": "abc" })));
/// assert!(added.previous.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEvent {
    /// Where the event originated.
    pub scope: Scope,
    /// Device the event concerns.
    pub device_id: DeviceId,
    /// Every registered device's tree, keyed by device id.
    pub snapshot: Value,
    /// Address of the changed field.
    pub path: Path,
    /// New value.
    pub value: Value,
    /// Previous value.
    pub previous: Value,
}

impl RegistryEvent {
    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId, tree: Value, snapshot: Value) -> Self {
        Self {
            scope: Scope::Devices,
            path: Path::root().child(device_id.as_str()),
            device_id,
            snapshot,
            value: tree,
            previous: Value::Null,
        }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId, last_tree: Value, snapshot: Value) -> Self {
        Self {
            scope: Scope::Devices,
            path: Path::root().child(device_id.as_str()),
            device_id,
            snapshot,
            value: Value::Null,
            previous: last_tree,
        }
    }

    /// Re-emits a device change at registry scope.
    #[must_use]
    pub fn device_changed(change: DeviceChange, snapshot: Value) -> Self {
        Self {
            scope: Scope::Device,
            device_id: change.device_id,
            snapshot,
            path: change.path,
            value: change.value,
            previous: change.previous,
        }
    }

    /// Returns the concerned device's tree within `snapshot`.
    ///
    /// `None` after the device was removed.
    #[must_use]
    pub fn device_snapshot(&self) -> Option<&Value> {
        self.snapshot.get(self.device_id.as_str())
    }

    /// Returns `true` if this is a device lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        self.scope == Scope::Devices
    }

    /// Returns `true` if this event announces a newly registered device.
    #[must_use]
    pub fn is_added(&self) -> bool {
        self.is_lifecycle() && self.previous.is_null()
    }

    /// Returns `true` if this event announces a removed device.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.is_lifecycle() && self.value.is_null()
    }
}
