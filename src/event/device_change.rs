// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-level change events.

use serde::Serialize;
use serde_json::Value;

use crate::tracker::Path;

use super::DeviceId;

/// A mutation of one device's state tree.
///
/// Delivered to listeners registered on a [`DeviceState`](crate::DeviceState).
/// `snapshot` is a copy of the whole tree taken right after the mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceChange {
    /// The device whose tree changed.
    pub device_id: DeviceId,
    /// The tree after the mutation.
    pub snapshot: Value,
    /// Address of the mutated field.
    pub path: Path,
    /// New value.
    pub value: Value,
    /// Value before the mutation.
    pub previous: Value,
}

impl DeviceChange {
    /// Returns `true` if the mutated field lies under `prefix`.
    ///
    /// ```
    /// # use microbit_sync::event::{DeviceChange, DeviceId};
    /// # use microbit_sync::tracker::Path;
    /// # use serde_json::{json, Value};
    /// let change = DeviceChange {
    ///     device_id: DeviceId::new("abc"),
    ///     snapshot: Value::Null,
    ///     path: Path::parse("temperature.data"),
    ///     value: json!(21.5),
    ///     previous: Value::Null,
    /// };
    /// assert!(change.is_under("temperature"));
    /// assert!(!change.is_under("led"));
    /// ```
    #[must_use]
    pub fn is_under(&self, prefix: &str) -> bool {
        self.path.starts_with(&Path::parse(prefix))
    }
}
