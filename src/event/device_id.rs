// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a board, as reported by the transport.
///
/// A thin wrapper around the transport's opaque identifier string, giving it
/// a distinct type so it cannot be confused with a device name.
///
/// # Examples
///
/// ```
/// use microbit_sync::event::DeviceId;
///
/// let id = DeviceId::new("abc");
/// assert_eq!(id.as_str(), "abc");
/// assert_eq!(id.to_string(), "abc");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates an identifier from the transport's identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality() {
        assert_eq!(DeviceId::new("abc"), DeviceId::from("abc"));
        assert_ne!(DeviceId::new("abc"), DeviceId::new("abd"));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", DeviceId::new("abc")), "DeviceId(abc)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&DeviceId::new("F0:12")).unwrap();
        assert_eq!(json, "\"F0:12\"");
    }

    #[test]
    fn hashable_and_borrowable() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(DeviceId::new("abc"), 1);
        assert_eq!(map.get("abc"), Some(&1));
    }
}
